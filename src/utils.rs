use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Deserialize a field, falling back to its default when the value is missing, `null`, or of
/// the wrong shape.
///
/// Backend payloads are assembled from a third-party API and are not strictly typed, so a
/// malformed count or array must never fail the whole report.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Currency amount with two decimal places, e.g. `600.00`
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Currency amount for display, e.g. `$1,000.00`
pub fn format_usd(amount: Decimal) -> String {
    let fixed = format_amount(amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < Decimal::ZERO {
        format!("-${}.{}", grouped, fraction)
    } else {
        format!("${}.{}", grouped, fraction)
    }
}
