use super::keys::CanonicalKey;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// An insertion-ordered string map for header lines that matched no
/// canonical key.
///
/// Generic `key : value` lines are stored first-occurrence-wins; lines with
/// no recognizable shape are stored under synthetic `LINE_<n>` keys. Order
/// is the order of first appearance in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OtherFields {
    entries: Vec<(String, String)>,
}

impl OtherFields {
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Inserts the pair unless the key is already present. Returns whether
    /// the pair was inserted.
    pub fn insert_first_wins(&mut self, key: &str, value: &str) -> bool {
        if self.contains_key(key) {
            return false;
        }
        self.entries.push((key.to_string(), value.to_string()));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for OtherFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// The parsed metadata of one TS file.
///
/// Every canonical key has a slot, absent unless the header (or the
/// stoichiometry post-pass) produced a value for it. `remarks` holds all
/// `REMARK`-tagged lines in file order; `other` captures everything else the
/// header scan could not attribute to a canonical key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataRecord {
    #[serde(rename = "STOICH")]
    pub stoich: Option<String>,
    #[serde(rename = "SCORE")]
    pub score: Option<String>,
    #[serde(rename = "METHOD")]
    pub method: Option<String>,
    #[serde(rename = "AUTHOR")]
    pub author: Option<String>,
    #[serde(rename = "MODEL")]
    pub model: Option<String>,
    #[serde(rename = "FORMAT")]
    pub format: Option<String>,
    #[serde(rename = "TITLE")]
    pub title: Option<String>,
    #[serde(rename = "COMPND")]
    pub compound: Option<String>,
    #[serde(rename = "REMARKS")]
    pub remarks: Vec<String>,
    #[serde(rename = "OTHER", skip_serializing_if = "OtherFields::is_empty")]
    pub other: OtherFields,
}

impl MetadataRecord {
    pub fn get(&self, key: CanonicalKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Stores `value` under `key`, overwriting any previous value (the last
    /// occurrence in a header wins).
    pub fn set(&mut self, key: CanonicalKey, value: String) {
        *self.slot_mut(key) = Some(value);
    }

    /// Whether any canonical field carries a non-empty value.
    pub fn has_recognized_fields(&self) -> bool {
        CanonicalKey::ALL
            .iter()
            .any(|&k| self.get(k).is_some_and(|v| !v.is_empty()))
    }

    fn slot(&self, key: CanonicalKey) -> &Option<String> {
        match key {
            CanonicalKey::Stoich => &self.stoich,
            CanonicalKey::Score => &self.score,
            CanonicalKey::Method => &self.method,
            CanonicalKey::Author => &self.author,
            CanonicalKey::Model => &self.model,
            CanonicalKey::Format => &self.format,
            CanonicalKey::Title => &self.title,
            CanonicalKey::Compnd => &self.compound,
        }
    }

    fn slot_mut(&mut self, key: CanonicalKey) -> &mut Option<String> {
        match key {
            CanonicalKey::Stoich => &mut self.stoich,
            CanonicalKey::Score => &mut self.score,
            CanonicalKey::Method => &mut self.method,
            CanonicalKey::Author => &mut self.author,
            CanonicalKey::Model => &mut self.model,
            CanonicalKey::Format => &mut self.format,
            CanonicalKey::Title => &mut self.title,
            CanonicalKey::Compnd => &mut self.compound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_previous_value() {
        let mut record = MetadataRecord::default();
        record.set(CanonicalKey::Score, "0.5".to_string());
        record.set(CanonicalKey::Score, "0.72".to_string());
        assert_eq!(record.get(CanonicalKey::Score), Some("0.72"));
    }

    #[test]
    fn other_fields_keep_first_value_and_insertion_order() {
        let mut other = OtherFields::default();
        assert!(other.insert_first_wins("Target", "H0232"));
        assert!(other.insert_first_wins("Date", "2024-05-01"));
        assert!(!other.insert_first_wins("Target", "H9999"));
        assert_eq!(other.get("Target"), Some("H0232"));
        let keys: Vec<_> = other.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Target", "Date"]);
    }

    #[test]
    fn has_recognized_fields_ignores_remarks_and_other() {
        let mut record = MetadataRecord::default();
        record.remarks.push("REMARK generated".to_string());
        record.other.insert_first_wins("Target", "H0232");
        assert!(!record.has_recognized_fields());
        record.set(CanonicalKey::Method, "ab-initio".to_string());
        assert!(record.has_recognized_fields());
    }

    #[test]
    fn every_canonical_key_maps_to_a_distinct_slot() {
        let mut record = MetadataRecord::default();
        for (i, key) in CanonicalKey::ALL.iter().enumerate() {
            record.set(*key, format!("v{i}"));
        }
        for (i, key) in CanonicalKey::ALL.iter().enumerate() {
            assert_eq!(record.get(*key), Some(format!("v{i}").as_str()));
        }
    }
}
