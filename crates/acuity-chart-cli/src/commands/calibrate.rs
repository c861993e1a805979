//! Calibration command.

use acuity_chart::calibration::reference_object_height_px;
use anyhow::Result;

use crate::CalibrationArgs;

pub fn run(args: &CalibrationArgs, json: bool, verbose: bool) -> Result<()> {
    let record = args.record(verbose)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("Calibration");
    println!("  {record}");
    println!(
        "  Reference card: {}px x {:.1}px",
        record.reference_object_px(),
        reference_object_height_px(record.reference_object_px())
    );
    println!("  Pixel ratio: {}", record.pixel_density());
    Ok(())
}
