mod loader;
mod pipeline;

pub use loader::load_listings;
pub use pipeline::{clean_listings, preprocess_file};
