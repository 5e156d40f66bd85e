//! Locale-tolerant percentage parsing.

/// Convert a percentage cell to `f64`, accepting a decimal comma.
///
/// Absent, empty and unparseable cells all yield `0.0`: a weight that cannot
/// be read counts as zero exposure rather than an error. Non-finite results
/// (`"inf"`, `"NaN"`) are treated the same way.
///
/// # Examples
///
/// ```
/// use etfblend_data::normalize_percent;
///
/// assert_eq!(normalize_percent(Some("12,34")), 12.34);
/// assert_eq!(normalize_percent(Some(" 0.5 ")), 0.5);
/// assert_eq!(normalize_percent(Some("n/a")), 0.0);
/// assert_eq!(normalize_percent(None), 0.0);
/// ```
pub fn normalize_percent(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
