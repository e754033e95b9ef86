//! Helpers shared by the inbound forms: trimming, list fields, numbers and patch fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::config::PRICE_LIMIT;

/// Deserialize a field that distinguishes "absent" from "explicitly null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// absent -> `None`, `null` -> `Some(None)`, value -> `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize an optional id posted as a number or as numeric text.
///
/// Blank or non-numeric text reads as no id.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberInput>::deserialize(deserializer)?.and_then(|n| n.to_i64()))
}

/// A numeric field posted either as a JSON number or as text.
///
/// Parsing is left to the form validators so a bad value becomes a field message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumberInput {
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            NumberInput::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
            NumberInput::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(whole))
            }
        }
    }

    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            NumberInput::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Some(Decimal::from(i)),
                (None, Some(u)) => Some(Decimal::from(u)),
                _ => n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
            },
            NumberInput::Text(text) => text.trim().parse::<Decimal>().ok(),
        }
    }
}

fn whole(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value <= i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}

impl From<i64> for NumberInput {
    fn from(value: i64) -> Self {
        NumberInput::Number(value.into())
    }
}

impl From<Decimal> for NumberInput {
    fn from(value: Decimal) -> Self {
        NumberInput::Text(value.to_string())
    }
}

/// A price rounded to cents, or `None` when it is missing, negative or too large.
pub fn price(value: Option<&NumberInput>) -> Option<Decimal> {
    value
        .and_then(NumberInput::to_decimal)
        .map(|p| p.round_dp(2))
        .filter(|p| !p.is_sign_negative() && *p < Decimal::from(PRICE_LIMIT))
}

/// A list field posted either as a JSON array or as newline-separated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ListInput {
    Items(Vec<String>),
    Lines(String),
}

impl ListInput {
    /// Trimmed entries with blanks dropped, order preserved.
    pub fn into_items(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            ListInput::Items(items) => items,
            ListInput::Lines(text) => text.lines().map(str::to_string).collect(),
        };

        raw.into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

impl Default for ListInput {
    fn default() -> Self {
        ListInput::Items(Vec::new())
    }
}

/// Trim a text field; blank becomes `None`.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Record "<label> must be at most <max> characters" when `value` is longer.
pub fn max_chars(value: &str, max: usize, label: &str, errors: &mut Vec<String>) {
    if value.chars().count() > max {
        errors.push(format!("{} must be at most {} characters", label, max));
    }
}

/// [`max_chars`] for an optional field.
pub fn max_chars_opt(value: Option<&str>, max: usize, label: &str, errors: &mut Vec<String>) {
    if let Some(value) = value {
        max_chars(value, max, label, errors);
    }
}

/// Trim a mandatory text field, recording `message` when it is blank.
pub fn required(value: &str, message: &str, errors: &mut Vec<String>) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(message.to_string());
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        phone: Option<Option<String>>,
    }

    #[test]
    fn test_double_option_distinguishes_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let cleared: Patch = serde_json::from_str(r#"{"phone":null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"phone":"555"}"#).unwrap();

        assert_eq!(absent.phone, None);
        assert_eq!(cleared.phone, Some(None));
        assert_eq!(set.phone, Some(Some("555".to_string())));
    }

    #[test]
    fn test_list_input_from_lines() {
        let input: ListInput = serde_json::from_str(r#""Walk\n\n  Feed \nPlay""#).unwrap();
        assert_eq!(input.into_items(), vec!["Walk", "Feed", "Play"]);
    }

    #[test]
    fn test_list_input_from_array() {
        let input: ListInput = serde_json::from_str(r#"[" a ", "", "b"]"#).unwrap();
        assert_eq!(input.into_items(), vec!["a", "b"]);
    }

    #[derive(Deserialize)]
    struct Picked {
        #[serde(default, deserialize_with = "lenient_id")]
        service_id: Option<i64>,
    }

    #[test]
    fn test_lenient_id_accepts_numeric_text() {
        let parse = |json: &str| serde_json::from_str::<Picked>(json).unwrap().service_id;

        assert_eq!(parse(r#"{"service_id":3}"#), Some(3));
        assert_eq!(parse(r#"{"service_id":"3"}"#), Some(3));
        assert_eq!(parse(r#"{"service_id":" 12 "}"#), Some(12));
        assert_eq!(parse(r#"{"service_id":""}"#), None);
        assert_eq!(parse(r#"{"service_id":"walk"}"#), None);
        assert_eq!(parse(r#"{"service_id":null}"#), None);
        assert_eq!(parse("{}"), None);
    }

    #[test]
    fn test_price_bounds() {
        let text = |s: &str| NumberInput::Text(s.to_string());

        assert_eq!(price(Some(&text("25.5"))), Some(Decimal::new(2550, 2)));
        assert_eq!(price(Some(&NumberInput::from(40))), Some(Decimal::new(40, 0)));
        assert_eq!(price(Some(&text("0"))), Some(Decimal::ZERO));
        assert_eq!(price(Some(&text("99999999.99"))), Some(Decimal::new(9_999_999_999, 2)));
        assert_eq!(price(Some(&text("100000000"))), None);
        assert_eq!(price(Some(&text("-1"))), None);
        assert_eq!(price(Some(&text("cheap"))), None);
        assert_eq!(price(None), None);
    }

    #[test]
    fn test_number_input_from_json() {
        let n: NumberInput = serde_json::from_str("12.5").unwrap();
        assert_eq!(n.to_decimal(), Some(Decimal::new(125, 1)));
        assert_eq!(n.to_i64(), None);

        let n: NumberInput = serde_json::from_str(r#""45""#).unwrap();
        assert_eq!(n.to_i64(), Some(45));
    }

    #[test]
    fn test_max_chars_counts_characters() {
        let mut errors = Vec::new();
        max_chars("éééé", 4, "Pincode", &mut errors);
        assert!(errors.is_empty());

        max_chars("12345", 4, "Pincode", &mut errors);
        max_chars_opt(None, 1, "Notes", &mut errors);
        assert_eq!(errors, vec!["Pincode must be at most 4 characters"]);
    }

    #[test]
    fn test_required_records_message() {
        let mut errors = Vec::new();
        assert_eq!(required("  Jane ", "Name is required", &mut errors), "Jane");
        assert!(errors.is_empty());

        required("   ", "Name is required", &mut errors);
        assert_eq!(errors, vec!["Name is required"]);
    }
}
