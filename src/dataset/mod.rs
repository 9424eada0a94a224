mod listing;
mod table;

pub use listing::{Listing, NumericColumn, RawListing};
pub use table::ListingTable;
