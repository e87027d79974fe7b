//! Plugin record types.
//!
//! A [`PluginRecord`] wraps the raw JSON object from the catalog API. The
//! core only reads a handful of fields; everything else is opaque and must
//! round-trip verbatim to `data.json`, so the record keeps the original
//! value instead of projecting it into a typed struct.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// One plugin listing as delivered by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginRecord(Value);

impl PluginRecord {
    /// Wraps a raw JSON value.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Stable identifier, rendered as a string.
    ///
    /// The API serves `id` as either a JSON number or a string; the string
    /// form keys the on-disk cache directory. Returns `None` when the field
    /// is absent or has a non-scalar type.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Display name, if present.
    pub fn name(&self) -> Option<&str> {
        self.str_field(&["name"])
    }

    /// Icon source URL. Empty strings read as absent.
    pub fn icon_url(&self) -> Option<&str> {
        self.str_field(&["icon_url"])
    }

    /// Content type of the icon, used to pick the local file extension.
    pub fn icon_content_type(&self) -> Option<&str> {
        self.str_field(&["icon_content_type"])
    }

    /// Screenshot source URL. Empty strings read as absent.
    pub fn screenshot_url(&self) -> Option<&str> {
        self.str_field(&["screenshot_url"])
    }

    /// `stats.installs`, read as 0 when absent or malformed.
    pub fn installs(&self) -> u64 {
        self.stat_field("installs")
    }

    /// `stats.forks`, read as 0 when absent or malformed.
    pub fn forks(&self) -> u64 {
        self.stat_field("forks")
    }

    /// Derived popularity metric: `installs + forks`.
    ///
    /// Always recomputed from the record, never trusted from disk.
    pub fn total_installs(&self) -> u64 {
        self.installs() + self.forks()
    }

    /// Comma-separated category tags from `author_bio.category`.
    pub fn category(&self) -> Option<&str> {
        self.str_field(&["author_bio", "category"])
    }

    /// The record serialized the way it is written to `data.json`.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(&self.0)
    }

    fn str_field(&self, path: &[&str]) -> Option<&str> {
        let mut value = &self.0;
        for key in path {
            value = value.get(*key)?;
        }
        match value.as_str() {
            Some(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    fn stat_field(&self, key: &str) -> u64 {
        match self.0.get("stats").and_then(|s| s.get(key)) {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
            Some(Value::String(s)) => s.parse().unwrap_or(0),
            _ => 0,
        }
    }
}

/// Presentation-facing view of one cached plugin.
///
/// Rebuilt on every read: the raw record plus locally-resolved asset paths
/// and the derived install count. Serializes as a single flat JSON object
/// with the enrichment keys injected beside the record's own fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPlugin {
    /// The record as loaded from `data.json`.
    pub record: PluginRecord,
    /// Relative path to the cached icon, if one exists.
    pub local_icon: Option<String>,
    /// Relative path to the cached screenshot, if one exists.
    pub local_screenshot: Option<String>,
    /// `stats.installs + stats.forks`, recomputed at read time.
    pub total_installs: u64,
}

impl EnrichedPlugin {
    /// Merges the enrichment fields into a copy of the record's JSON object.
    ///
    /// Non-object records (tolerated on the way in) enrich to an empty
    /// object rather than failing.
    pub fn to_value(&self) -> Value {
        let mut object = match self.record.as_value() {
            Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        object.insert("local_icon".into(), json_opt(&self.local_icon));
        object.insert("local_screenshot".into(), json_opt(&self.local_screenshot));
        object.insert("total_installs".into(), Value::from(self.total_installs));
        Value::Object(object)
    }
}

impl Serialize for EnrichedPlugin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn json_opt(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::String(s.clone()),
        None => Value::Null,
    }
}
