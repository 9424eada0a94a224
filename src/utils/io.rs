use crate::dataset::ListingTable;
use crate::error::Result;
use log::{error, info};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Writes the cleaned table back out as CSV, known columns first and any
/// passthrough columns after them in sorted order.
pub fn save_cleaned_csv(table: &ListingTable, output_path: &Path) -> Result<()> {
    info!(
        "Saving cleaned table with {} listings to {:?}",
        table.len(),
        output_path
    );

    let extra_columns: BTreeSet<&str> = table
        .listings()
        .flat_map(|l| l.extra.keys().map(String::as_str))
        .collect();

    let mut writer = csv::Writer::from_path(output_path)?;

    let mut header = vec!["Price", "Marla", "Bedrooms", "Washrooms", "Location"];
    header.extend(extra_columns.iter().copied());
    writer.write_record(&header)?;

    for listing in table.listings() {
        let mut record = vec![
            format!("{}", listing.price),
            format!("{}", listing.marla),
            format!("{}", listing.bedrooms),
            format!("{}", listing.washrooms),
            listing.location.clone(),
        ];
        for column in &extra_columns {
            record.push(listing.extra.get(*column).cloned().unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    info!("Cleaned dataset written to {:?}", output_path);
    Ok(())
}

/// Serializes a report to pretty-printed JSON on disk.
pub fn export_report_json<T: Serialize>(report: &T, output_path: &Path) -> Result<()> {
    let json = match serde_json::to_string_pretty(report) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize report to JSON: {}", e);
            return Err(e.into());
        }
    };

    match fs::write(output_path, &json) {
        Ok(_) => {
            info!(
                "Successfully wrote {} bytes to {:?}",
                json.len(),
                output_path
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to write JSON to file {:?}: {}", output_path, e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Listing;
    use tempfile::NamedTempFile;

    #[test]
    fn cleaned_csv_round_trips_extra_columns() {
        let mut table = ListingTable::new();
        let mut extra = std::collections::BTreeMap::new();
        extra.insert("Furnished".to_string(), "yes".to_string());
        table.add_listing(Listing {
            price: 250_000.0,
            marla: 20.0,
            bedrooms: 3.0,
            washrooms: 2.0,
            location: "DHA".to_string(),
            extra,
        });

        let out = NamedTempFile::new().expect("temp file");
        save_cleaned_csv(&table, out.path()).expect("save");

        let written = std::fs::read_to_string(out.path()).expect("read");
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("Price,Marla,Bedrooms,Washrooms,Location,Furnished")
        );
        assert_eq!(lines.next(), Some("250000,20,3,2,DHA,yes"));
    }

    #[test]
    fn report_json_is_pretty_printed() {
        #[derive(Serialize)]
        struct Dummy {
            rows: usize,
        }

        let out = NamedTempFile::new().expect("temp file");
        export_report_json(&Dummy { rows: 3 }, out.path()).expect("export");
        let written = std::fs::read_to_string(out.path()).expect("read");
        assert!(written.contains("\"rows\": 3"));
    }
}
