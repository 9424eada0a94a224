use super::{Listing, NumericColumn};
use std::collections::HashMap;

/// The cleaned dataset: single source of truth for all downstream
/// statistics within one analysis pass. Not mutated after preprocessing;
/// filters return a new table.
#[derive(Debug, Clone, Default)]
pub struct ListingTable {
    listings: Vec<Listing>,
    listings_by_location: HashMap<String, Vec<usize>>,
}

impl ListingTable {
    pub fn new() -> Self {
        ListingTable {
            listings: Vec::new(),
            listings_by_location: HashMap::new(),
        }
    }

    pub fn add_listing(&mut self, listing: Listing) {
        self.listings_by_location
            .entry(listing.location.clone())
            .or_default()
            .push(self.listings.len());
        self.listings.push(listing);
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn listings(&self) -> impl Iterator<Item = &Listing> {
        self.listings.iter()
    }

    /// Extracts one numeric column as a vector for the statistics engine.
    pub fn column(&self, column: NumericColumn) -> Vec<f64> {
        self.listings.iter().map(|l| l.value(column)).collect()
    }

    /// Distinct values of a numeric column, ascending. The presentation
    /// layer builds its category pickers from these.
    pub fn distinct_values(&self, column: NumericColumn) -> Vec<f64> {
        let mut values = self.column(column);
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();
        values
    }

    pub fn locations(&self) -> Vec<&str> {
        let mut locations: Vec<&str> = self.listings_by_location.keys().map(String::as_str).collect();
        locations.sort_unstable();
        locations
    }

    /// Locations matching a case-insensitive substring search.
    pub fn search_locations(&self, term: &str) -> Vec<&str> {
        let needle = term.to_lowercase();
        self.locations()
            .into_iter()
            .filter(|loc| loc.to_lowercase().contains(&needle))
            .collect()
    }

    /// Listing counts per location, most frequent first.
    pub fn location_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .listings_by_location
            .iter()
            .map(|(loc, ids)| (loc.clone(), ids.len()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    /// Mean price per location, most expensive first.
    pub fn mean_price_by_location(&self) -> Vec<(String, f64)> {
        let mut means: Vec<(String, f64)> = self
            .listings_by_location
            .iter()
            .map(|(loc, ids)| {
                let total: f64 = ids.iter().map(|&i| self.listings[i].price).sum();
                (loc.clone(), total / ids.len() as f64)
            })
            .collect();
        means.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        means
    }

    pub fn filter_marla_range(&self, min: f64, max: f64) -> ListingTable {
        self.filter(|l| l.marla >= min && l.marla <= max)
    }

    pub fn filter_bedrooms(&self, bedrooms: &[f64]) -> ListingTable {
        self.filter(|l| bedrooms.contains(&l.bedrooms))
    }

    pub fn filter_locations(&self, locations: &[&str]) -> ListingTable {
        self.filter(|l| locations.contains(&l.location.as_str()))
    }

    fn filter<F: Fn(&Listing) -> bool>(&self, keep: F) -> ListingTable {
        let mut table = ListingTable::new();
        for listing in self.listings.iter().filter(|l| keep(l)) {
            table.add_listing(listing.clone());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: f64, marla: f64, bedrooms: f64, location: &str) -> Listing {
        Listing {
            price,
            marla,
            bedrooms,
            washrooms: 2.0,
            location: location.to_string(),
            extra: Default::default(),
        }
    }

    fn sample_table() -> ListingTable {
        let mut table = ListingTable::new();
        table.add_listing(listing(50_000.0, 5.0, 2.0, "DHA"));
        table.add_listing(listing(80_000.0, 10.0, 3.0, "DHA"));
        table.add_listing(listing(30_000.0, 3.0, 2.0, "Gulberg"));
        table.add_listing(listing(120_000.0, 20.0, 4.0, "Bahria Town"));
        table
    }

    #[test]
    fn column_extraction_preserves_order() {
        let table = sample_table();
        assert_eq!(
            table.column(NumericColumn::Price),
            vec![50_000.0, 80_000.0, 30_000.0, 120_000.0]
        );
    }

    #[test]
    fn location_counts_most_frequent_first() {
        let table = sample_table();
        let counts = table.location_counts();
        assert_eq!(counts[0], ("DHA".to_string(), 2));
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn mean_price_by_location_descending() {
        let table = sample_table();
        let means = table.mean_price_by_location();
        assert_eq!(means[0].0, "Bahria Town");
        assert_eq!(means[1], ("DHA".to_string(), 65_000.0));
    }

    #[test]
    fn filters_return_new_table_and_leave_source_intact() {
        let table = sample_table();
        let filtered = table
            .filter_marla_range(4.0, 12.0)
            .filter_bedrooms(&[2.0, 3.0])
            .filter_locations(&["DHA"]);
        assert_eq!(filtered.len(), 2);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn search_locations_case_insensitive() {
        let table = sample_table();
        assert_eq!(table.search_locations("dha"), vec!["DHA"]);
        assert!(table.search_locations("nowhere").is_empty());
    }

    #[test]
    fn distinct_values_sorted_and_deduped() {
        let table = sample_table();
        assert_eq!(
            table.distinct_values(NumericColumn::Bedrooms),
            vec![2.0, 3.0, 4.0]
        );
    }
}
