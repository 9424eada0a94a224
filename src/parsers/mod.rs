mod units;

pub use units::{UnitParser, parse_area, parse_price};
