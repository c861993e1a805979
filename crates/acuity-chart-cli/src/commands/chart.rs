//! Whole-chart sizing command.

use acuity_chart::{AcuityTable, ChartConfig, render_chart};
use anyhow::Result;

use crate::CalibrationArgs;

pub fn run(args: &CalibrationArgs, config: ChartConfig, json: bool, verbose: bool) -> Result<()> {
    let record = args.record(verbose)?;
    let table = AcuityTable::standard();
    let chart = render_chart(&table, Some(&record), &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
        return Ok(());
    }

    println!("{record}");
    println!();
    println!(
        "{:<4} {:<8} {:>8} {:>12} {:>12} {:>8}",
        "Line", "Acuity", "Arcmin", "Height(px)", "Font(px)", "mm"
    );
    println!("{:-<57}", "");

    for (i, level) in chart.iter().enumerate() {
        println!(
            "{:<4} {:<8} {:>8.2} {:>12.3} {:>12.3} {:>8}",
            i + 1,
            level.label,
            level.arcminutes,
            level.letter_height_px,
            level.font_size_px,
            level.millimeters.map_or("-".to_string(), |mm| format!("{mm:.1}"))
        );
    }
    Ok(())
}
