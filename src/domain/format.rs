// Display formatting for derived metrics (en-US grouping, no locale tables)

/// Marker shown in place of a value we do not have. Never coerced to zero.
pub const NO_VALUE: &str = "—";

/// `16800` -> `"16,800"`
pub fn format_number(value: impl Into<u128>) -> String {
    group_thousands(&value.into().to_string())
}

/// Whole-dollar currency: `24000.4` -> `"$24,000"`, `-97.0` -> `"-$97"`.
pub fn format_currency(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    Some(format!("{}${}", sign, group_thousands(&digits)))
}

/// At most one fraction digit, trailing zero dropped: `5.74` -> `"5.7"`, `5.0` -> `"5"`.
pub fn format_decimal(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let rendered = format!("{:.1}", value.abs());
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "0"));
    let mut out = String::new();
    if value < 0.0 && rendered != "0.0" {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if fraction != "0" {
        out.push('.');
        out.push_str(fraction);
    }
    Some(out)
}

/// Signed percentage delta: `17.3` -> `"+17.3%"`, `-2.0` -> `"-2%"`.
pub fn format_delta(value: f64) -> Option<String> {
    let body = format_decimal(value)?;
    if body.starts_with('-') {
        Some(format!("{}%", body))
    } else {
        Some(format!("+{}%", body))
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
