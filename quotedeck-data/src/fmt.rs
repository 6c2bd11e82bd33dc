//! Display formatting for quote-denominated figures.

/// Format a currency amount, abbreviating large magnitudes.
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("${:.2}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.2}K", value / 1_000.0)
    } else {
        format!("${:.2}", value)
    }
}

/// Format a signed percentage with an explicit `+` on gains.
pub fn format_percentage(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}

/// Format a supply figure, abbreviating large magnitudes.
pub fn format_supply(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("{:.2}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.2}K", value / 1_000.0)
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(950_000_000_000.0), "$950.00B");
        assert_eq!(format_currency(1_250_000.0), "$1.25M");
        assert_eq!(format_currency(50_000.0), "$50.00K");
        assert_eq!(format_currency(0.52), "$0.52");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(2.5), "+2.50%");
        assert_eq!(format_percentage(0.0), "+0.00%");
        assert_eq!(format_percentage(-1.234), "-1.23%");
    }

    #[test]
    fn test_format_supply() {
        assert_eq!(format_supply(19_000_000.0), "19.00M");
        assert_eq!(format_supply(45_000_000_000.0), "45.00B");
        assert_eq!(format_supply(999.0), "999.00");
    }
}
