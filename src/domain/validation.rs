//! Field validators used to block invalid input before it reaches the
//! calculator. They answer yes/no and never fail.

/// Empty text, or a whole number of minutes in `0..=59`.
pub fn is_valid_minute(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return true;
    }

    text.parse::<i64>()
        .map(|minutes| (0..=59).contains(&minutes))
        .unwrap_or(false)
}

/// Empty text, or a finite real number that is not negative.
pub fn is_non_negative_number(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return true;
    }

    text.parse::<f64>()
        .map(|value| value.is_finite() && value >= 0.0)
        .unwrap_or(false)
}

/// Coerces a raw form field into a calculator input. Anything that is not a
/// finite, non-negative number becomes zero.
pub fn parse_or_zero(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_minutes() {
        for text in ["0", "30", "59", ""] {
            assert!(is_valid_minute(text), "{text:?}");
        }
    }

    #[test]
    fn rejects_invalid_minutes() {
        for text in ["60", "-1", "abc", "5.5", "1e1"] {
            assert!(!is_valid_minute(text), "{text:?}");
        }
    }

    #[test]
    fn accepts_non_negative_numbers() {
        for text in ["0", "1.5", "100", "", " 2 "] {
            assert!(is_non_negative_number(text), "{text:?}");
        }
    }

    #[test]
    fn rejects_negative_or_garbage() {
        for text in ["-1", "-0.5", "abc", "1.2.3", "NaN", "inf"] {
            assert!(!is_non_negative_number(text), "{text:?}");
        }
    }

    #[test]
    fn parse_or_zero_sanitizes() {
        assert_eq!(parse_or_zero("12.5"), 12.5);
        assert_eq!(parse_or_zero(""), 0.0);
        assert_eq!(parse_or_zero("abc"), 0.0);
        assert_eq!(parse_or_zero("-3"), 0.0);
        assert_eq!(parse_or_zero("inf"), 0.0);
    }
}
