//! Timestamp parsing for record times.

use serde_json::Value;

/// Parse `HH:MM:SS,mmm` or `HH:MM:SS.mmm` into seconds.
///
/// Minutes and seconds must be below 60. The fraction may have one to
/// three digits (`,5` is half a second).
pub fn parse_clock_time(s: &str) -> Option<f64> {
    let s = s.trim();
    let mut parts = s.split(':');
    let (hours, minutes, rest) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let (seconds, fraction) = match rest.split_once([',', '.']) {
        Some((sec, frac)) => (sec, Some(frac)),
        None => (rest, None),
    };

    let hours = parse_digits(hours)?;
    let minutes = parse_digits(minutes)?;
    let seconds = parse_digits(seconds)?;
    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    let millis = match fraction {
        Some(frac) if (1..=3).contains(&frac.len()) => {
            let value = parse_digits(frac)?;
            value * 10u64.pow(3 - frac.len() as u32)
        }
        Some(_) => return None,
        None => 0,
    };

    Some((hours * 3600 + minutes * 60 + seconds) as f64 + millis as f64 / 1000.0)
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse a record time: a JSON number of seconds, a numeric string, or a
/// clock string.
///
/// Negative and non-finite values are rejected.
pub fn parse_timestamp(value: &Value) -> Option<f64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.contains(':') {
                parse_clock_time(s)?
            } else {
                s.parse::<f64>().ok()?
            }
        }
        _ => return None,
    };
    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}
