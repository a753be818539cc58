// Best-effort numeric reading of valuation display strings
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueRange {
    pub min: u64,
    pub max: u64,
}

/// Pull a numeric range out of a free-form value such as `"₹1,200 - ₹1,500"`.
///
/// Thousands separators are dropped, then the first and last digit runs
/// become `min` and `max`. A single number yields a degenerate range.
/// Returns `None` when the text carries no digits.
pub fn extract_value_range(text: &str) -> Option<ValueRange> {
    let cleaned = text.replace(',', "");
    let numbers: Vec<u64> = cleaned
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse().ok())
        .collect();

    let min = *numbers.first()?;
    let max = *numbers.last()?;
    Some(ValueRange { min, max })
}
