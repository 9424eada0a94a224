use crate::dataset::RawListing;
use crate::error::{PropstatError, Result};
use csv::ReaderBuilder;
use log::{debug, error, info};
use std::fs::File;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 5] = ["Price", "Marla", "Bedrooms", "Washrooms", "Location"];

/// Reads raw listings from a CSV file.
///
/// The file must carry the Price, Marla, Bedrooms, Washrooms and Location
/// columns; a missing column is a data-shape error that propagates to the
/// caller. Any other columns are captured verbatim into the listing's
/// extra map.
pub fn load_listings(path: &Path) -> Result<Vec<RawListing>> {
    info!("Loading listings from {:?}", path);

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to open dataset {:?}: {}", path, e);
            return Err(PropstatError::DataLoad(e));
        }
    };

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader.headers()?.clone();
    let mut column_index = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in column_index.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = match headers.iter().position(|h| h == name) {
            Some(idx) => idx,
            None => {
                error!("Column '{}' missing from {:?}", name, path);
                return Err(PropstatError::DataShape {
                    column: name.to_string(),
                });
            }
        };
    }
    let [price_idx, marla_idx, bedrooms_idx, washrooms_idx, location_idx] = column_index;

    let mut listings = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let mut listing = RawListing::new(
            field(price_idx),
            field(marla_idx),
            field(bedrooms_idx),
            field(washrooms_idx),
            field(location_idx),
        );
        for (idx, header) in headers.iter().enumerate() {
            if !column_index.contains(&idx) {
                listing = listing.with_extra(header.to_string(), field(idx));
            }
        }
        listings.push(listing);
    }

    debug!("Read {} raw rows from {:?}", listings.len(), path);
    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn loads_rows_with_extra_columns() {
        let file = write_csv(
            "Price,Marla,Bedrooms,Washrooms,Location,Furnished\n\
             2.5 Lakh,5 Marla,3,2,DHA,yes\n\
             75 Thousand,1 Kanal,4,3,Gulberg,no\n",
        );
        let listings = load_listings(file.path()).expect("load");
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].price, "2.5 Lakh");
        assert_eq!(listings[0].extra.get("Furnished").map(String::as_str), Some("yes"));
        assert_eq!(listings[1].location, "Gulberg");
    }

    #[test]
    fn missing_required_column_is_shape_error() {
        let file = write_csv("Price,Marla,Bedrooms,Location\n1 Lakh,5 Marla,3,DHA\n");
        let err = load_listings(file.path()).unwrap_err();
        match err {
            crate::error::PropstatError::DataShape { column } => {
                assert_eq!(column, "Washrooms");
            }
            other => panic!("expected DataShape, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_load_error() {
        let err = load_listings(Path::new("/nonexistent/listings.csv")).unwrap_err();
        assert!(matches!(err, crate::error::PropstatError::DataLoad(_)));
    }
}
