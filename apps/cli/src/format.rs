//! Number formatting for text reports.

/// Grouped integer below one million, two-decimal scientific notation above.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".into();
    }
    if v < 1e6 {
        return group_thousands(v.round());
    }
    format!("{:.2e}", v)
}

/// Small upgrade values keep a few decimals.
pub fn format_value(v: f64) -> String {
    if v.is_finite() && v.abs() < 1000.0 {
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        return if s == "-0" { "0".into() } else { s.to_string() };
    }
    format_number(v)
}

pub fn format_pct(v: f64) -> String {
    if v == f64::INFINITY {
        return "∞%".into();
    }
    format!("{:.2}%", v)
}

fn group_thousands(v: f64) -> String {
    if v == f64::NEG_INFINITY {
        return "-inf".into();
    }
    let digits = format!("{:.0}", v.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if v < 0.0 && digits != "0" {
        out.insert(0, '-');
    }
    out
}
