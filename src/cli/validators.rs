//! CLI argument validators.

/// Parse and validate a detection threshold, `(0.0, 1.0]`.
pub fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(value > 0.0 && value <= 1.0) {
        return Err(format!(
            "threshold must be greater than 0.0 and at most 1.0, got {value}"
        ));
    }

    Ok(value)
}

/// Parse and validate a top-k count, at least 1.
pub fn parse_top_k(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid count"))?;

    if value == 0 {
        return Err("top_k must be at least 1".to_string());
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold_valid() {
        assert_eq!(parse_threshold("0.1").ok(), Some(0.1));
        assert_eq!(parse_threshold("1.0").ok(), Some(1.0));
        assert_eq!(parse_threshold("0.0001").ok(), Some(0.0001));
    }

    #[test]
    fn test_parse_threshold_invalid() {
        assert!(parse_threshold("0").is_err());
        assert!(parse_threshold("1.01").is_err());
        assert!(parse_threshold("-0.5").is_err());
        assert!(parse_threshold("NaN").is_err());
        let err = parse_threshold("abc").unwrap_err();
        assert!(err.contains("not a valid number"));
    }

    #[test]
    fn test_parse_top_k() {
        assert_eq!(parse_top_k("3").ok(), Some(3));
        assert!(parse_top_k("0").is_err());
        assert!(parse_top_k("-1").is_err());
    }
}
