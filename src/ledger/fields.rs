//! Insertion-ordered maps keyed by field name, ticket serial, or denomination.

use std::fmt;
use std::marker::PhantomData;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// A small map that keeps keys in the order they were first inserted.
///
/// Shift data sets hold a handful of entries per record, so lookups are a
/// linear scan. Serializes as a JSON object whose key order is preserved on
/// both write and read.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

/// Operator-entered field values keyed by field name.
pub type FieldMap = OrderedMap<String>;

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.position(key).map(move |idx| &mut self.entries[idx].1)
    }

    /// Inserts or replaces `key`; a replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Returns the value for `key`, appending `make()` first when absent.
    pub fn entry_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let idx = match self.position(key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.to_string(), make()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.iter_mut().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == key)
    }
}

impl FieldMap {
    /// Borrowed view of a field value, `None` when the field is not present.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }

    /// Resets every value to blank while keeping the field names.
    pub fn blank_values(&mut self) {
        for value in self.values_mut() {
            value.clear();
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of named entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Turns a camel-case field name into a spaced label: a space goes in front of
/// every ASCII uppercase letter and the result is trimmed.
///
/// `gasSales` becomes `gas Sales`, `cashToATM` becomes `cash To A T M`. Casing is
/// left exactly as written.
pub fn spaced_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(ch);
    }
    label.trim().to_string()
}

/// Form label used by the shell: the spaced label with its first letter capitalized.
pub fn form_label(key: &str) -> String {
    let spaced = spaced_label(key);
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position_on_replace() {
        let mut map = FieldMap::new();
        map.insert("gasSales", "10".to_string());
        map.insert("deliSales", "4".to_string());
        map.insert("gasSales", "12".to_string());

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["gasSales", "deliSales"]);
        assert_eq!(map.value("gasSales"), Some("12"));
    }

    #[test]
    fn json_roundtrip_preserves_order() {
        let map: FieldMap = [("zeta", "1"), ("alpha", "2"), ("mid", "3")]
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"2","mid":"3"}"#);

        let back: FieldMap = serde_json::from_str(&json).unwrap();
        let keys: Vec<&str> = back.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn spaced_label_matches_literal_split() {
        assert_eq!(spaced_label("gasSales"), "gas Sales");
        assert_eq!(spaced_label("cashToATM"), "cash To A T M");
        assert_eq!(spaced_label("PaidIn"), "Paid In");
        assert_eq!(spaced_label("ebt"), "ebt");
    }

    #[test]
    fn form_label_capitalizes_first_letter() {
        assert_eq!(form_label("nonTaxGrocerySales"), "Non Tax Grocery Sales");
        assert_eq!(form_label(""), "");
    }

    #[test]
    fn blank_values_keeps_names() {
        let mut map: FieldMap = [("cash", "5".to_string()), ("check", "7".to_string())]
            .into_iter()
            .collect();
        map.blank_values();
        assert_eq!(map.value("cash"), Some(""));
        assert_eq!(map.len(), 2);
    }
}
