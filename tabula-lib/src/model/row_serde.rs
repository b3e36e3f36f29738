//! JSON (de)serialization for Row.
//!
//! A row is a JSON object. Field order is preserved in both directions,
//! and values go through [`Value::from_json`]/[`Value::to_json`] so that
//! integers stay integers and nested containers are kept verbatim.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::Row;
use super::Value;

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, &value.to_json())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RowVisitor)
    }
}

struct RowVisitor;

impl<'de> Visitor<'de> for RowVisitor {
    type Value = Row;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map representing a table row")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Row, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut row = Row {
            fields: Vec::with_capacity(map.size_hint().unwrap_or(0)),
        };

        while let Some(key) = map.next_key::<String>()? {
            let value: serde_json::Value = map.next_value()?;
            // Duplicate keys: last one wins, like JSON.parse
            row.insert(key, Value::from_json(value));
        }

        Ok(row)
    }
}

/// Parses a JSON array of objects into rows.
pub fn rows_from_json(json: &str) -> Result<Vec<Row>, serde_json::Error> {
    serde_json::from_str(json)
}
