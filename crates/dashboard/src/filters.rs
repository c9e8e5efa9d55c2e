//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Local::now().year())
}

/// Groups the digits of a whole number with commas.
///
/// Usage in templates: `{{ account.balance|thousands }}` renders `1,247`.
/// Values that are not plain digit strings pass through unchanged.
#[askama::filter_fn]
pub fn thousands(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        Ok(farm2hand_core::group_thousands(&raw))
    } else {
        Ok(raw)
    }
}
