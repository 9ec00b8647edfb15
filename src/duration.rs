// ELAPSED-TIME PARSING FOR SCALE TEST OUTPUT
// THE SCALE BINARY WRITES GO-STYLE DURATIONS: OPTIONAL HOURS, OPTIONAL
// MINUTES, REQUIRED (POSSIBLY FRACTIONAL) SECONDS. e.g. 1h2m3.5s, 45s

use std::sync::OnceLock;

use regex::Regex;

use crate::error::DriverError;

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(\d+)h)?(?:(\d+)m)?(\d+(?:\.\d+)?)s$")
            .expect("duration regex is valid")
    })
}

/// Parse a duration string into fractional minutes.
pub fn parse_minutes(text: &str) -> Result<f64, DriverError> {
    let bad = || DriverError::Duration(text.to_string());
    let caps = duration_regex().captures(text.trim()).ok_or_else(bad)?;

    let field = |i: usize| -> Result<f64, DriverError> {
        match caps.get(i) {
            Some(m) => m.as_str().parse::<f64>().map_err(|_| bad()),
            None => Ok(0.0),
        }
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    Ok(hours * 60.0 + minutes + seconds / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn full_form() {
        let m = parse_minutes("1h2m3.5s").unwrap();
        assert!(close(m, 62.0 + 3.5 / 60.0), "GOT {}", m);
    }

    #[test]
    fn seconds_only() {
        assert!(close(parse_minutes("45s").unwrap(), 0.75));
    }

    #[test]
    fn minutes_and_seconds() {
        assert!(close(parse_minutes("1m30s").unwrap(), 1.5));
        assert!(close(parse_minutes("3m0s").unwrap(), 3.0));
    }

    #[test]
    fn hours_without_minutes() {
        assert!(close(parse_minutes("2h15s").unwrap(), 120.25));
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert!(close(parse_minutes("  45s\n").unwrap(), 0.75));
    }

    #[test]
    fn missing_seconds_rejected() {
        assert!(matches!(parse_minutes("1h2m"), Err(DriverError::Duration(_))));
        assert!(parse_minutes("5m").is_err());
        assert!(parse_minutes("").is_err());
        assert!(parse_minutes("abc").is_err());
        assert!(parse_minutes("1.5m3s").is_err());
    }
}
