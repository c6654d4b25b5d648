//! Lenient number handling. Nothing in here returns an error: unparsable
//! values become zero and are logged.

/// Parse a trimmed, finite number. `None` for blanks, text, NaN and infinities.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Float coercion with a zero default. Blank input is silently zero.
pub fn coerce_f64(raw: &str) -> f64 {
    if raw.trim().is_empty() {
        return 0.0;
    }
    match parse_number(raw) {
        Some(v) => v,
        None => {
            tracing::warn!(value = raw, "non-numeric value coerced to 0");
            0.0
        }
    }
}

/// Integer coercion with a zero default. `"12.0"` and `"12.9"` both give 12.
pub fn coerce_int(raw: &str) -> i64 {
    if let Ok(n) = raw.trim().parse::<i64>() {
        return n;
    }
    coerce_f64(raw) as i64
}

/// Round to `places` decimals, exact halves to even (`0.03125` gives `0.0312` at 4 places).
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round_ties_even() / factor
}

/// Shortest decimal that round-trips, with whole numbers kept as `N.0`.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
