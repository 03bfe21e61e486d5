//! Deserialization: serde `Deserialize` impls that build a [`Value`] tree
//! from any self-describing format.

use std::fmt;

use serde::de::{Deserialize, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};

use super::{array::Array, node::Value, object::Object};

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueDeVisitor)
    }
}

struct ValueDeVisitor;

impl<'de> Visitor<'de> for ValueDeVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any valid JSON value")
    }

    #[inline]
    fn visit_bool<E>(self, val: bool) -> Result<Value, E> {
        Ok(Value::new_bool(val))
    }

    #[inline]
    fn visit_i64<E>(self, val: i64) -> Result<Value, E> {
        Ok(Value::new_i64(val))
    }

    #[inline]
    fn visit_u64<E>(self, val: u64) -> Result<Value, E> {
        Ok(Value::new_u64(val))
    }

    #[inline]
    fn visit_f64<E: serde::de::Error>(self, val: f64) -> Result<Value, E> {
        Value::new_f64(val)
            .ok_or_else(|| E::invalid_value(serde::de::Unexpected::Float(val), &self))
    }

    #[inline]
    fn visit_str<E>(self, val: &str) -> Result<Value, E> {
        Ok(Value::copy_str(val))
    }

    #[inline]
    fn visit_string<E>(self, val: String) -> Result<Value, E> {
        Ok(Value::copy_str(&val))
    }

    #[inline]
    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::new_null())
    }

    #[inline]
    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::new_null())
    }

    #[inline]
    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut elems = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(elem) = seq.next_element()? {
            elems.push(elem);
        }
        Ok(Value::from_vec(elems))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        // Start from the sentinel so that an empty map stays unallocated.
        let mut value = Value::new();
        while let Some(key) = map.next_key_seed(KeySeed)? {
            let val = map.next_value()?;
            value.insert_key_value(key, val);
        }
        Ok(value)
    }
}

/// Deserializes a map key straight into a string `Value`, inline when short.
struct KeySeed;

impl<'de> DeserializeSeed<'de> for KeySeed {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(KeySeed)
    }
}

impl<'de> Visitor<'de> for KeySeed {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object key")
    }

    #[inline]
    fn visit_str<E>(self, val: &str) -> Result<Value, E> {
        Ok(Value::copy_str(val))
    }

    #[inline]
    fn visit_string<E>(self, val: String) -> Result<Value, E> {
        Ok(Value::copy_str(&val))
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D>(deserializer: D) -> Result<Object, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let typ = value.json_type();
        value.into_object().ok_or_else(|| {
            serde::de::Error::custom(format_args!("expected a JSON object, found {typ}"))
        })
    }
}

impl<'de> Deserialize<'de> for Array {
    fn deserialize<D>(deserializer: D) -> Result<Array, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let typ = value.json_type();
        value.into_array().ok_or_else(|| {
            serde::de::Error::custom(format_args!("expected a JSON array, found {typ}"))
        })
    }
}

#[cfg(test)]
mod test {
    use crate::{json, Array, JsonValueTrait, Object, Value};

    #[test]
    fn test_deserialize_tree() {
        let text = r#"{"a": [1, -2, 2.5, "s", null, true], "b": {"c": {}}}"#;
        let got: Value = serde_json::from_str(text).unwrap();
        assert_eq!(got, json!({"a": [1, -2, 2.5, "s", null, true], "b": {"c": {}}}));
        assert_eq!(got["a"][0].as_u64(), Some(1));
        assert_eq!(got["a"][1].as_i64(), Some(-2));
    }

    #[test]
    fn test_empty_map_stays_sentinel() {
        let got: Value = serde_json::from_str("{}").unwrap();
        assert_eq!(got.tag(), Value::EMPTY_OBJECT);
    }

    #[test]
    fn test_deserialize_facades() {
        let obj: Object = serde_json::from_str(r#"{"k": 1}"#).unwrap();
        assert_eq!(obj["k"], 1);
        assert!(serde_json::from_str::<Object>("[1]").is_err());

        let arr: Array = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(arr.len(), 2);
        assert!(serde_json::from_str::<Array>("1").is_err());
    }

    #[test]
    fn test_text_roundtrip() {
        let text = r#"{"a":[1,2.5,"s\n"],"b":null}"#;
        let value: Value = serde_json::from_str(text).unwrap();
        assert_eq!(crate::to_string(&value), text);
    }
}
