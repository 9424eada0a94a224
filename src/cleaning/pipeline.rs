use crate::cleaning::loader::load_listings;
use crate::dataset::{Listing, ListingTable, NumericColumn, RawListing};
use crate::error::{PropstatError, Result};
use crate::parsers::UnitParser;
use crate::utils::io::save_cleaned_csv;
use log::{debug, info};
use std::collections::HashSet;
use std::path::Path;

/// Runs the cleaning pipeline over raw listings.
///
/// Steps, in order, each feeding the next:
/// 1. drop exact duplicate rows (all columns identical, first kept)
/// 2. parse price and area text into numeric units
/// 3. coerce bedroom/washroom counts, non-numeric becomes missing
/// 4. fill missing values in each numeric column with that column's median
pub fn clean_listings(rows: Vec<RawListing>) -> Result<ListingTable> {
    let input_count = rows.len();

    let mut seen = HashSet::new();
    let rows: Vec<RawListing> = rows
        .into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect();
    info!(
        "Removed {} duplicate rows, {} remain",
        input_count - rows.len(),
        rows.len()
    );

    let parser = UnitParser::new();
    let mut prices: Vec<Option<f64>> = Vec::with_capacity(rows.len());
    let mut marlas: Vec<Option<f64>> = Vec::with_capacity(rows.len());
    let mut bedrooms: Vec<Option<f64>> = Vec::with_capacity(rows.len());
    let mut washrooms: Vec<Option<f64>> = Vec::with_capacity(rows.len());
    for row in &rows {
        prices.push(parser.parse_price(&row.price));
        marlas.push(parser.parse_area(&row.area));
        bedrooms.push(coerce_numeric(&row.bedrooms));
        washrooms.push(coerce_numeric(&row.washrooms));
    }

    // Imputation order: price, area, bedrooms, washrooms. Each column's
    // median is computed over its own parseable values only.
    impute_median(&mut prices, NumericColumn::Price)?;
    impute_median(&mut marlas, NumericColumn::Marla)?;
    impute_median(&mut bedrooms, NumericColumn::Bedrooms)?;
    impute_median(&mut washrooms, NumericColumn::Washrooms)?;

    let mut table = ListingTable::new();
    for (i, row) in rows.into_iter().enumerate() {
        table.add_listing(Listing {
            price: prices[i].unwrap_or(f64::NAN),
            marla: marlas[i].unwrap_or(f64::NAN),
            bedrooms: bedrooms[i].unwrap_or(f64::NAN),
            washrooms: washrooms[i].unwrap_or(f64::NAN),
            location: row.location,
            extra: row.extra,
        });
    }

    info!("Cleaned table holds {} listings", table.len());
    Ok(table)
}

/// Loads, cleans and optionally persists a listings dataset.
///
/// The cleaned CSV is written only when a destination is explicitly given.
pub fn preprocess_file(input: &Path, save_to: Option<&Path>) -> Result<ListingTable> {
    let rows = load_listings(input)?;
    let table = clean_listings(rows)?;

    if let Some(destination) = save_to {
        save_cleaned_csv(&table, destination)?;
    }

    Ok(table)
}

fn coerce_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

// Fills the column's missing entries with the median of its present values.
// A column with no parseable values at all has no defined median, which is a
// computation error rather than something to paper over.
fn impute_median(values: &mut [Option<f64>], column: NumericColumn) -> Result<()> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return Err(PropstatError::Computation(format!(
            "column '{}' has no parseable values to impute from",
            column.as_str()
        )));
    }
    present.sort_by(|a, b| a.total_cmp(b));
    let median = median_of_sorted(&present);

    let mut filled = 0usize;
    for value in values.iter_mut() {
        if value.is_none() {
            *value = Some(median);
            filled += 1;
        }
    }
    debug!(
        "Imputed {} missing {} values with median {}",
        filled,
        column.as_str(),
        median
    );
    Ok(())
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn raw(price: &str, area: &str, bedrooms: &str, washrooms: &str, location: &str) -> RawListing {
        RawListing::new(
            price.to_string(),
            area.to_string(),
            bedrooms.to_string(),
            washrooms.to_string(),
            location.to_string(),
        )
    }

    #[test]
    fn duplicates_never_survive() {
        let rows = vec![
            raw("1 Lakh", "5 Marla", "3", "2", "DHA"),
            raw("1 Lakh", "5 Marla", "3", "2", "DHA"),
            raw("2 Lakh", "10 Marla", "4", "3", "Gulberg"),
        ];
        let table = clean_listings(rows).expect("clean");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn near_duplicates_are_kept() {
        let rows = vec![
            raw("1 Lakh", "5 Marla", "3", "2", "DHA"),
            raw("1 Lakh", "5 Marla", "3", "3", "DHA"),
        ];
        let table = clean_listings(rows).expect("clean");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn no_missing_values_after_imputation() {
        let rows = vec![
            raw("1 Lakh", "5 Marla", "3", "2", "DHA"),
            raw("not listed", "unknown", "studio", "-", "Gulberg"),
            raw("3 Lakh", "15 Marla", "5", "4", "Bahria Town"),
        ];
        let table = clean_listings(rows).expect("clean");
        for listing in table.listings() {
            assert!(listing.price.is_finite());
            assert!(listing.marla.is_finite());
            assert!(listing.bedrooms.is_finite());
            assert!(listing.washrooms.is_finite());
        }
    }

    #[test]
    fn imputed_value_is_median_of_parseable_values() {
        let rows = vec![
            raw("1 Lakh", "5 Marla", "2", "1", "A"),
            raw("2 Lakh", "10 Marla", "3", "2", "B"),
            raw("6 Lakh", "20 Marla", "4", "3", "C"),
            raw("bad", "1 Kanal", "5", "4", "D"),
        ];
        let table = clean_listings(rows).expect("clean");
        let imputed = table.listings().nth(3).expect("row");
        // median of 100k, 200k, 600k
        assert_eq!(imputed.price, 200_000.0);
        assert_eq!(imputed.marla, 20.0);
    }

    #[test]
    fn even_count_median_averages_middle_pair() {
        let rows = vec![
            raw("1 Lakh", "4 Marla", "2", "1", "A"),
            raw("2 Lakh", "6 Marla", "3", "2", "B"),
            raw("4 Lakh", "8 Marla", "4", "3", "C"),
            raw("6 Lakh", "10 Marla", "5", "4", "D"),
            raw("x", "12 Marla", "6", "5", "E"),
        ];
        let table = clean_listings(rows).expect("clean");
        let imputed = table.listings().nth(4).expect("row");
        // median of 100k, 200k, 400k, 600k = 300k
        assert_eq!(imputed.price, 300_000.0);
    }

    #[test]
    fn column_with_no_parseable_values_fails() {
        let rows = vec![
            raw("bad", "5 Marla", "3", "2", "A"),
            raw("worse", "10 Marla", "4", "3", "B"),
        ];
        let err = clean_listings(rows).unwrap_err();
        assert!(matches!(err, PropstatError::Computation(_)));
    }

    #[test]
    fn end_to_end_synthetic_dataset() {
        let mut content = String::from("Price,Marla,Bedrooms,Washrooms,Location\n");
        for i in 0..96 {
            let row = match i % 4 {
                0 => format!("{} Lakh,{} Marla,{},{},DHA\n", 1 + i % 7, 3 + i % 9, 2 + i % 4, 1 + i % 3),
                1 => format!("{} Thousand,1 Kanal,{},{},Gulberg\n", 50 + i, 3 + i % 3, 2 + i % 2),
                2 => format!("{},{},{},{},Bahria Town\n", 40_000 + 100 * i, 5 + i % 6, 3, 2),
                _ => format!("unlisted,{} Marla,4,2,Model Town\n", 4 + i),
            };
            content.push_str(&row);
        }
        // four exact duplicates of the first data row
        for _ in 0..4 {
            content.push_str("1 Lakh,3 Marla,2,1,DHA\n");
        }

        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write csv");

        let table = preprocess_file(file.path(), None).expect("preprocess");
        // 100 input rows; row 0 ("1 Lakh,3 Marla,2,1,DHA") appears four
        // more times verbatim at the end, so exactly 4 rows drop out.
        assert_eq!(table.len(), 96);
        for listing in table.listings() {
            assert!(listing.price.is_finite());
            assert!(listing.marla.is_finite());
            assert!(listing.bedrooms.is_finite());
            assert!(listing.washrooms.is_finite());
        }
    }

    #[test]
    fn preprocess_writes_cleaned_csv_on_request() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(
            b"Price,Marla,Bedrooms,Washrooms,Location\n\
              2.5 Lakh,1 Kanal,3,2,DHA\n\
              75 Thousand,5 Marla,2,1,Gulberg\n",
        )
        .expect("write csv");
        let out = NamedTempFile::new().expect("output file");

        let table = preprocess_file(file.path(), Some(out.path())).expect("preprocess");
        assert_eq!(table.len(), 2);

        let written = std::fs::read_to_string(out.path()).expect("read back");
        assert!(written.starts_with("Price,Marla,Bedrooms,Washrooms,Location"));
        assert!(written.contains("250000"));
        assert!(written.contains("20"));
    }
}
