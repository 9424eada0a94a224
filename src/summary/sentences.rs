use crate::dataset::{ListingTable, NumericColumn};
use crate::utils::format::format_price;

/// Candidate sentences describing the dataset's key statistics, in the
/// order the dashboard presents them when no ranking is available.
pub fn build_summary_sentences(table: &ListingTable) -> Vec<String> {
    if table.is_empty() {
        return Vec::new();
    }

    let prices = table.column(NumericColumn::Price);
    let n = prices.len() as f64;
    let avg_price = prices.iter().sum::<f64>() / n;
    let median_price = median(&prices);
    let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let top_locations: Vec<String> = table
        .location_counts()
        .into_iter()
        .take(3)
        .map(|(loc, _)| loc)
        .collect();

    let avg_marla = table.column(NumericColumn::Marla).iter().sum::<f64>() / n;
    let avg_bedrooms = table.column(NumericColumn::Bedrooms).iter().sum::<f64>() / n;

    vec![
        format!("The average property price is Rs. {}", format_price(avg_price)),
        format!("The median property price is Rs. {}", format_price(median_price)),
        format!(
            "Prices range from Rs. {} to Rs. {}",
            format_price(min_price),
            format_price(max_price)
        ),
        format!("Top locations are {}", top_locations.join(", ")),
        format!("Average property size is {:.1} Marla", avg_marla),
        format!("Average number of bedrooms is {:.1}", avg_bedrooms),
    ]
}

/// Candidate sentences for the market outlook narrative.
pub fn build_prediction_sentences(table: &ListingTable) -> Vec<String> {
    if table.is_empty() {
        return Vec::new();
    }

    let premium_locations: Vec<String> = table
        .mean_price_by_location()
        .into_iter()
        .take(3)
        .map(|(loc, _)| loc)
        .collect();

    let counts = table.location_counts();
    let busiest_share = counts
        .first()
        .map(|(_, count)| 100.0 * *count as f64 / table.len() as f64)
        .unwrap_or(0.0);

    vec![
        format!("Top locations by price are {}", premium_locations.join(", ")),
        format!("Market size is {} properties", table.len()),
        format!(
            "The busiest location holds {:.0}% of all listings",
            busiest_share
        ),
        "Premium locations show strong price performance".to_string(),
        "Consider investing in high-growth areas".to_string(),
    ]
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
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
    use crate::dataset::Listing;

    fn table() -> ListingTable {
        let mut table = ListingTable::new();
        for (price, marla, bedrooms, location) in [
            (100_000.0, 5.0, 2.0, "DHA"),
            (200_000.0, 10.0, 3.0, "DHA"),
            (300_000.0, 12.0, 4.0, "Gulberg"),
        ] {
            table.add_listing(Listing {
                price,
                marla,
                bedrooms,
                washrooms: 2.0,
                location: location.to_string(),
                extra: Default::default(),
            });
        }
        table
    }

    #[test]
    fn summary_sentences_cover_key_statistics() {
        let sentences = build_summary_sentences(&table());
        assert_eq!(sentences.len(), 6);
        assert_eq!(sentences[0], "The average property price is Rs. 2.00L");
        assert_eq!(sentences[1], "The median property price is Rs. 2.00L");
        assert!(sentences[2].contains("1.00L") && sentences[2].contains("3.00L"));
        assert!(sentences[3].starts_with("Top locations are DHA"));
        assert!(sentences[4].contains("9.0 Marla"));
    }

    #[test]
    fn prediction_sentences_rank_locations_by_price() {
        let sentences = build_prediction_sentences(&table());
        assert!(sentences[0].starts_with("Top locations by price are Gulberg"));
        assert!(sentences[1].contains("3 properties"));
        assert!(sentences[2].contains("67%"));
    }

    #[test]
    fn empty_table_yields_no_sentences() {
        let empty = ListingTable::new();
        assert!(build_summary_sentences(&empty).is_empty());
        assert!(build_prediction_sentences(&empty).is_empty());
    }
}
