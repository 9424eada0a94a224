/// Formats a rupee amount in the Pakistani numbering scale.
///
/// 12_500_000 -> "1.25Cr", 250_000 -> "2.50L", 75_000 -> "75K".
pub fn format_price(value: f64) -> String {
    if value >= 10_000_000.0 {
        format!("{:.2}Cr", value / 10_000_000.0)
    } else if value >= 100_000.0 {
        format!("{:.2}L", value / 100_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_magnitude() {
        assert_eq!(format_price(12_500_000.0), "1.25Cr");
        assert_eq!(format_price(250_000.0), "2.50L");
        assert_eq!(format_price(75_000.0), "75K");
        assert_eq!(format_price(850.0), "850");
    }

    #[test]
    fn boundaries() {
        assert_eq!(format_price(10_000_000.0), "1.00Cr");
        assert_eq!(format_price(100_000.0), "1.00L");
        assert_eq!(format_price(1_000.0), "1K");
    }
}
