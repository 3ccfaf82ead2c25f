//! CSV export for simulation tick records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::TickRecord;

/// Column header for CSV telemetry export.
const HEADER: &str = "tick,time_hr,production_kw,demand_kw,imbalance_kw,\
                      charged_kwh,discharged_kwh,stored_energy_kwh,purchase_energy_kwh";

/// Exports tick records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tick. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `records` - Tick records in simulation order
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[TickRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes tick records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[TickRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.tick.to_string(),
            format!("{:.4}", r.time_hr),
            format!("{:.4}", r.production_kw),
            format!("{:.4}", r.demand_kw),
            format!("{:.4}", r.imbalance_kw),
            format!("{:.4}", r.charged_kwh),
            format!("{:.4}", r.discharged_kwh),
            format!("{:.4}", r.stored_energy_kwh),
            format!("{:.4}", r.purchase_energy_kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
