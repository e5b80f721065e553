//! CSV export for scenario bill trajectories.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::trajectory::Trajectories;

/// Column header for the chart-row CSV export.
const HEADER: &str = "year,baseline,unoptimized,flexible,dispatchable";

/// Exports the four trajectories to a CSV file at the given path.
///
/// Writes a header row followed by one row per projected year with every
/// scenario's monthly bill. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(trajectories: &Trajectories, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(trajectories, buf)
}

/// Writes the four trajectories as CSV to any writer.
///
/// # Arguments
///
/// * `trajectories` - Output of `generate_all_trajectories`
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(trajectories: &Trajectories, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for row in trajectories.chart_rows() {
        wtr.write_record(&[
            row.year.to_string(),
            format!("{:.4}", row.baseline),
            format!("{:.4}", row.unoptimized),
            format!("{:.4}", row.flexible),
            format!("{:.4}", row.dispatchable),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::profile::{DEFAULT_DATA_CENTER, DEFAULT_UTILITY};
    use crate::model::tariff::GENERIC_TARIFF;
    use crate::model::trajectory::generate_all_trajectories;

    fn trajectories(years: u32) -> Trajectories {
        generate_all_trajectories(
            &DEFAULT_UTILITY,
            &DEFAULT_DATA_CENTER,
            years,
            Some(&GENERIC_TARIFF),
        )
        .unwrap()
    }

    fn render(t: &Trajectories) -> String {
        let mut buf = Vec::new();
        write_csv(t, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_lists_scenarios() {
        let output = render(&trajectories(3));
        assert_eq!(
            output.lines().next(),
            Some("year,baseline,unoptimized,flexible,dispatchable")
        );
    }

    #[test]
    fn one_row_per_year() {
        let output = render(&trajectories(10));
        // 1 header + 11 years
        assert_eq!(output.lines().count(), 12);
        let first_row = output.lines().nth(1).unwrap_or("");
        assert!(first_row.starts_with("2025,130.0000,"));
    }

    #[test]
    fn deterministic_output() {
        let t = trajectories(5);
        assert_eq!(render(&t), render(&t));
    }

    #[test]
    fn rows_parse_back_as_numbers() {
        let output = render(&trajectories(4));
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let mut rows = 0;
        for record in rdr.records() {
            let rec = record.unwrap();
            assert!(rec[0].parse::<u32>().is_ok());
            for i in 1..5 {
                assert!(rec[i].parse::<f64>().is_ok(), "column {i}");
            }
            rows += 1;
        }
        assert_eq!(rows, 5);
    }
}
