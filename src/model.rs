use serde::Deserialize;
use serde_json::Value;

/// One raw record as it appears in a capability table dump. Field values may
/// be encoded as strings or numbers depending on the dumping tool, so the
/// numeric fields are kept as `Value` until coercion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Tag", default)]
    pub tag: String,
    #[serde(rename = "Permissions", default)]
    pub permissions: String,
    #[serde(rename = "Executive", default)]
    pub executive: String,
    #[serde(rename = "Global", default)]
    pub global: String,
    #[serde(rename = "Object Type", default)]
    pub object_type: String,
    #[serde(rename = "Bounds", default)]
    pub bounds: String,
    #[serde(rename = "Address", default)]
    pub address: Value,
    #[serde(rename = "Reference", default)]
    pub reference: Value,
    #[serde(rename = "Type", default)]
    pub r#type: String,
}

/// A typed capability descriptor. Constructed once from a [`RawRecord`] and
/// immutable afterwards.
///
/// Coercion is tolerant: an `Address` or `Reference` that does not parse as an
/// integer becomes `None`. A descriptor without a reference is excluded from
/// vertical placement and never sources an arrow; a descriptor without a
/// numeric address simply has no outgoing arrow. Neither is an error.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub tag: String,
    pub permissions: String,
    pub executive: String,
    pub global_flag: String,
    pub object_type: String,
    pub bounds: String,
    /// Display text of the raw address field, numeric or not.
    pub address: String,
    /// The address coerced to an integer, when it is one.
    pub address_value: Option<i64>,
    pub reference: Option<i64>,
    /// Grouping key; one panel is drawn per distinct value.
    pub type_name: String,
}

impl Descriptor {
    pub fn from_record(record: RawRecord) -> Self {
        let address_value = coerce_int(&record.address);
        Self {
            tag: record.tag,
            permissions: record.permissions,
            executive: record.executive,
            global_flag: record.global,
            object_type: record.object_type,
            bounds: record.bounds,
            address: value_display(&record.address),
            address_value,
            reference: coerce_int(&record.reference),
            type_name: record.r#type,
        }
    }

    /// Labels for the six colored field boxes, in drawing order.
    pub fn field_labels(&self) -> [&str; 6] {
        [
            &self.tag,
            &self.permissions,
            &self.executive,
            &self.global_flag,
            &self.object_type,
            &self.bounds,
        ]
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(record: Value) -> Descriptor {
        Descriptor::from_record(serde_json::from_value(record).unwrap())
    }

    #[test]
    fn coerces_string_and_number_addresses() {
        let from_string = descriptor(json!({"Type": "A", "Address": "42", "Reference": 1}));
        assert_eq!(from_string.address_value, Some(42));
        assert_eq!(from_string.address, "42");

        let from_number = descriptor(json!({"Type": "A", "Address": 42, "Reference": 1}));
        assert_eq!(from_number.address_value, Some(42));
        assert_eq!(from_number.address, "42");
    }

    #[test]
    fn non_numeric_address_degrades_to_none() {
        let desc = descriptor(json!({"Type": "A", "Address": "0xbad idea", "Reference": 3}));
        assert_eq!(desc.address_value, None);
        // The display text survives even when the value does not coerce.
        assert_eq!(desc.address, "0xbad idea");
        assert_eq!(desc.reference, Some(3));
    }

    #[test]
    fn missing_reference_is_absent_not_fatal() {
        let desc = descriptor(json!({"Type": "B", "Address": "7"}));
        assert_eq!(desc.reference, None);
        assert_eq!(desc.type_name, "B");
    }

    #[test]
    fn missing_display_fields_default_to_empty() {
        let desc = descriptor(json!({"Type": "C", "Reference": "5"}));
        assert_eq!(desc.reference, Some(5));
        assert_eq!(desc.field_labels(), [""; 6]);
        assert_eq!(desc.address, "");
    }
}
