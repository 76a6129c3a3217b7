use crate::model::CellValue;

/// Formats a number with thousands separators and at most three fraction
/// digits, trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let scaled = (value.abs() * 1000.0).round();
    let text = format!("{:.3}", scaled / 1000.0);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if value < 0.0 && scaled != 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn display_text(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => format_number(*n),
        CellValue::Text(s) => s.clone(),
        CellValue::Empty => String::new(),
    }
}

/// True for numbers and for text that reads as a plain number.
pub fn is_numeric(value: &CellValue) -> bool {
    match value {
        CellValue::Number(n) => n.is_finite(),
        CellValue::Text(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
        CellValue::Empty => false,
    }
}

/// Numeric reading of rendered cell text once separators are stripped.
pub fn sort_number(text: &str) -> Option<f64> {
    let stripped = strip_separators(text);
    if stripped.is_empty() {
        return None;
    }
    stripped.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn strip_separators(text: &str) -> String {
    text.trim().replace(',', "")
}
