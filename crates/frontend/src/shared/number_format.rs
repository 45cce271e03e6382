//! Number formatting for table cells

/// Group the integer part in thousands with `,` and keep two decimals.
///
/// Values the backend sends as text are parsed first; anything that is not a
/// number is returned untouched: `"1234.5"` becomes `"1,234.50"`.
pub fn format_amount(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => group_thousands(&format!("{:.2}", value)),
        _ => raw.to_string(),
    }
}

/// Quantities keep their decimals only when they have any
pub fn format_quantity(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => {
            group_thousands(&format!("{:.0}", value))
        }
        Ok(value) if value.is_finite() => group_thousands(&value.to_string()),
        _ => raw.to_string(),
    }
}

fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, decimals) = match unsigned.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (unsigned, None),
    };

    let mut grouped = String::new();
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match decimals {
        Some(d) => format!("{}{}.{}", sign, grouped, d),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("1234.56"), "1,234.56");
        assert_eq!(format_amount("1234567.891"), "1,234,567.89");
        assert_eq!(format_amount("0"), "0.00");
        assert_eq!(format_amount("-1234.5"), "-1,234.50");
        assert_eq!(format_amount("12"), "12.00");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity("4"), "4");
        assert_eq!(format_quantity("2500"), "2,500");
        assert_eq!(format_quantity("1.5"), "1.5");
    }

    #[test]
    fn test_non_numeric_is_kept() {
        assert_eq!(format_amount("a consultar"), "a consultar");
        assert_eq!(format_quantity(""), "");
    }
}
