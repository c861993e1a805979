//! Interactive session command.
//!
//! Reads one command per line from stdin and prints the resulting display
//! snapshot as a JSON line.

use std::io::{self, BufRead, Write};

use acuity_chart::{AcuityTable, ChartConfig, ChartSession, Direction, NavCommand, NavigationEngine};
use anyhow::{Context, Result, anyhow, bail};
use log::warn;

use crate::CalibrationArgs;

/// One parsed stdin command.
#[derive(Debug, Clone, PartialEq)]
enum Input {
    Command(NavCommand),
    Direction(Direction),
    Tap { x: f64, block_left: f64, block_width: f64 },
    Narrow(bool),
    Goto(String),
    Restart,
    Reset,
    Show,
}

fn parse_number(token: Option<&str>, name: &str) -> Result<f64> {
    let token = token.ok_or_else(|| anyhow!("missing {name}"))?;
    token
        .parse()
        .with_context(|| format!("invalid {name}: {token}"))
}

/// Parse a line; blank lines and `#` comments yield `None`.
fn parse_line(line: &str) -> Result<Option<Input>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace();
    let Some(verb) = tokens.next() else {
        return Ok(None);
    };

    let input = match verb.to_lowercase().as_str() {
        "next" | "n" => Input::Command(NavCommand::NextLine),
        "prev" | "p" => Input::Command(NavCommand::PrevLine),
        "cycle" | "c" => Input::Command(NavCommand::CycleLetters),
        "up" => Input::Direction(Direction::Up),
        "down" => Input::Direction(Direction::Down),
        "left" => Input::Direction(Direction::Left),
        "right" => Input::Direction(Direction::Right),
        "tap" => Input::Tap {
            x: parse_number(tokens.next(), "tap x")?,
            block_left: parse_number(tokens.next(), "block left")?,
            block_width: parse_number(tokens.next(), "block width")?,
        },
        "narrow" => match tokens.next() {
            Some("on" | "true" | "1") => Input::Narrow(true),
            Some("off" | "false" | "0") => Input::Narrow(false),
            other => bail!("narrow expects on|off, got {:?}", other),
        },
        "goto" => Input::Goto(
            tokens
                .next()
                .ok_or_else(|| anyhow!("goto expects a label such as 20/40"))?
                .to_string(),
        ),
        "restart" => Input::Restart,
        "reset" => Input::Reset,
        "show" => Input::Show,
        other => bail!("unknown command: {other}"),
    };
    Ok(Some(input))
}

fn apply(session: &ChartSession, input: Input) -> Result<()> {
    let nav = session.navigator();
    match input {
        Input::Command(command) => {
            nav.update(|engine| engine.apply(command));
        }
        Input::Direction(direction) => {
            nav.update(|engine| engine.handle_direction(direction));
        }
        Input::Tap { x, block_left, block_width } => {
            nav.update(|engine| engine.handle_tap(x, block_left, block_width));
        }
        Input::Narrow(narrow) => session.set_narrow_viewport(narrow),
        Input::Goto(label) => {
            nav.update(|engine| engine.jump_to_label(&label))?;
        }
        Input::Restart => nav.update(NavigationEngine::restart),
        Input::Reset => nav.update(NavigationEngine::reset),
        Input::Show => {}
    }
    Ok(())
}

pub fn run(args: &CalibrationArgs, config: ChartConfig, narrow: bool, verbose: bool) -> Result<()> {
    let mut session = ChartSession::with_config(args.display(), AcuityTable::standard(), config)?;
    let record = session.confirm_calibration(args.card_width(), args.distance_ft)?;
    if verbose {
        eprintln!("Calibrated: {record}");
        eprintln!("Commands: next prev cycle up down left right tap narrow goto restart reset show");
    }
    session.set_narrow_viewport(narrow);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string(&session.snapshot())?)?;

    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line.context("Failed to read stdin")?;
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                warn!("line {}: {e}", line_no + 1);
                continue;
            }
        };
        if let Err(e) = apply(&session, input) {
            warn!("line {}: {e}", line_no + 1);
            continue;
        }
        writeln!(stdout, "{}", serde_json::to_string(&session.snapshot())?)?;
    }
    Ok(())
}
