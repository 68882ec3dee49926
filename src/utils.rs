use crate::errors::DriftError;
use std::cmp::Ordering;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    let mut s = String::new();
    for i in items {
        s.push_str(i);
        s.push_str(&String::from(", "));
    }
    s
}

// Validation
pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), DriftError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(DriftError::InvalidParameter(parameter.to_string(), ex_msg, value.to_string()))
    } else {
        Ok(())
    }
}

/// Any value except NaN.
pub fn validate_number_parameter(value: f64, parameter: &str) -> Result<(), DriftError> {
    validate_float_parameter(value, f64::NEG_INFINITY, f64::INFINITY, parameter)
}

/// Sort a slice of floats in ascending order, NaN values are not expected.
pub fn sort_floats(v: &mut [f64]) {
    v.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Format a share as a percentage, `0.3` becomes `30.00%`.
pub fn fmt_percent(v: f64, precision: usize) -> String {
    format!("{:.*}%", precision, v * 100.0)
}

/// Escape text for safe inclusion in HTML.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_to_strings() {
        assert_eq!(items_to_strings(vec!["Auto", "Exact"]), "Auto, Exact, ");
    }

    #[test]
    fn test_validate_number_parameter() {
        assert!(validate_number_parameter(0.3, "threshold").is_ok());
        assert!(validate_number_parameter(-1.0, "threshold").is_ok());
        assert!(validate_number_parameter(f64::INFINITY, "threshold").is_ok());
        let err = validate_number_parameter(f64::NAN, "threshold").unwrap_err();
        assert!(matches!(err, DriftError::InvalidParameter(p, _, v) if p == "threshold" && v == "NaN"));
    }

    #[test]
    fn test_validate_float_parameter_range() {
        assert!(validate_float_parameter(0.5, 0.0, 1.0, "p").is_ok());
        assert!(validate_float_parameter(1.5, 0.0, 1.0, "p").is_err());
    }

    #[test]
    fn test_sort_floats() {
        let mut v = vec![3.0, -1.0, 2.0];
        sort_floats(&mut v);
        assert_eq!(v, vec![-1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_fmt_percent() {
        assert_eq!(fmt_percent(0.3, 2), "30.00%");
        assert_eq!(fmt_percent(1.0 / 3.0, 1), "33.3%");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
