//! Number formatting for chat replies

/// Abbreviated currency: `$1.5B`, `$2.3M`, `$1.2K`, `$500`
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let value = amount.abs();

    if value >= 1_000_000_000.0 {
        format!("{}${:.1}B", sign, value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{}${:.1}M", sign, value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{}${:.1}K", sign, value / 1_000.0)
    } else {
        format!("{}${}", sign, value.round() as u64)
    }
}

/// Count with thousands separators: `12,345`
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Signed value with fixed decimals: `+1.2`, `-0.4`, `0.0`
pub fn format_signed(value: f64, decimals: usize) -> String {
    let rounded = format!("{:.*}", decimals, value);
    if value > 0.0 && !rounded.chars().all(|c| c == '0' || c == '.') {
        format!("+{}", rounded)
    } else if rounded.starts_with('-') && rounded[1..].chars().all(|c| c == '0' || c == '.') {
        rounded[1..].to_string()
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1_500_000_000.0), "$1.5B");
        assert_eq!(format_currency(2_300_000.0), "$2.3M");
        assert_eq!(format_currency(1_200.0), "$1.2K");
        assert_eq!(format_currency(500.0), "$500");
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(-2_300_000.0), "-$2.3M");
    }

    #[test]
    fn test_format_currency_boundaries() {
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1_000.0), "$1.0K");
        assert_eq!(format_currency(1_000_000.0), "$1.0M");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(700), "700");
        assert_eq!(format_count(1_234), "1,234");
        assert_eq!(format_count(12_345_678), "12,345,678");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(1.26, 1), "+1.3");
        assert_eq!(format_signed(-0.4, 1), "-0.4");
        assert_eq!(format_signed(0.0, 1), "0.0");
        assert_eq!(format_signed(-0.01, 1), "0.0");
    }
}
