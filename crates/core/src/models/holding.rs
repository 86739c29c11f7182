use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::group::GroupKey;

/// Raw `asset_class` of a record, keeping "sent as null" and "not sent at
/// all" apart from an actual (possibly empty) string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Value(String),
    Null,
    #[default]
    Missing,
}

impl AssetClass {
    /// The string value, or None for null / missing.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AssetClass::Value(value) => Some(value),
            AssetClass::Null | AssetClass::Missing => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, AssetClass::Missing)
    }
}

/// Values print verbatim; null and missing print as `(null)` / `(missing)`.
impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::Value(value) => f.write_str(value),
            AssetClass::Null => write!(f, "(null)"),
            AssetClass::Missing => write!(f, "(missing)"),
        }
    }
}

impl From<&str> for AssetClass {
    fn from(value: &str) -> Self {
        AssetClass::Value(value.to_string())
    }
}

impl From<String> for AssetClass {
    fn from(value: String) -> Self {
        AssetClass::Value(value)
    }
}

/// A single holding as delivered by the record source.
///
/// Records have no identity beyond their position in the source collection,
/// so there is no `id` field.
///
/// Missing fields are not validated: absent or `null` text fields become
/// the empty string, absent numbers stay `None`, and `asset_class` keeps
/// exactly what was sent (see [`AssetClass`]). A field of the wrong JSON
/// type (e.g. `"avg_price": "n/a"`) is not tolerated and rejects the whole
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    /// Human-readable holding name (e.g., "Apple Inc.")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    /// Ticker symbol as sent by the source (not normalized)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ticker: String,

    /// Asset class; this is the grouping attribute.
    #[serde(
        default,
        deserialize_with = "asset_class_from_wire",
        serialize_with = "asset_class_to_wire",
        skip_serializing_if = "AssetClass::is_missing"
    )]
    pub asset_class: AssetClass,

    #[serde(default)]
    pub avg_price: Option<f64>,

    #[serde(default)]
    pub market_price: Option<f64>,

    /// Latest change in percent. Negative values are flagged by the UI.
    #[serde(default, rename = "latest_chg_pct")]
    pub latest_change_pct: Option<f64>,

    /// Market value in the base currency.
    #[serde(default, rename = "market_value_ccy")]
    pub market_value_base_ccy: Option<f64>,
}

impl HoldingRecord {
    /// Build a fully populated record.
    pub fn new(
        name: impl Into<String>,
        ticker: impl Into<String>,
        asset_class: impl Into<String>,
        avg_price: f64,
        market_price: f64,
        latest_change_pct: f64,
        market_value_base_ccy: f64,
    ) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
            asset_class: AssetClass::Value(asset_class.into()),
            avg_price: Some(avg_price),
            market_price: Some(market_price),
            latest_change_pct: Some(latest_change_pct),
            market_value_base_ccy: Some(market_value_base_ccy),
        }
    }

    /// The group this record belongs to. Exact value, no trimming or case folding.
    #[must_use]
    pub fn group_key(&self) -> GroupKey {
        GroupKey::from(self.asset_class.clone())
    }

    /// True when the latest change is present and below zero.
    #[must_use]
    pub fn has_negative_change(&self) -> bool {
        self.latest_change_pct.is_some_and(|pct| pct < 0.0)
    }
}

/// Wire envelope of the holdings endpoint: `{ "payload": [ ... ] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingsResponse {
    pub payload: Vec<HoldingRecord>,
}

impl HoldingsResponse {
    /// Decode an endpoint body into records, keeping payload order.
    pub fn parse(body: &str) -> Result<Vec<HoldingRecord>, serde_json::Error> {
        let resp: HoldingsResponse = serde_json::from_str(body)?;
        Ok(resp.payload)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Only reached for a present field; an absent one falls back to `Missing`.
fn asset_class_from_wire<'de, D>(deserializer: D) -> Result<AssetClass, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<String>::deserialize(deserializer)? {
        Some(value) => AssetClass::Value(value),
        None => AssetClass::Null,
    })
}

fn asset_class_to_wire<S>(value: &AssetClass, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.as_str() {
        Some(value) => serializer.serialize_str(value),
        None => serializer.serialize_none(),
    }
}
