//! Serialization: serde `Serialize` for values, `to_value` for building a
//! [`Value`] out of any serializable type, and the JSON text writer.

use std::fmt::{Display, Write};

use serde::ser::{Impossible, Serialize, SerializeMap as _, SerializeSeq as _};

use super::{array::Array, node::Value, object::Object};
use crate::error::{Error, Result};

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.tag() {
            Value::NULL => serializer.serialize_unit(),
            Value::BOOL => serializer.serialize_bool(self.bool()),
            Value::SIGNED => serializer.serialize_i64(self.i64()),
            Value::UNSIGNED => serializer.serialize_u64(self.u64()),
            Value::DOUBLE => serializer.serialize_f64(self.f64()),
            Value::SHORT_STR | Value::STRING => serializer.serialize_str(self.str_slice()),
            Value::ARRAY => {
                let elems = self.as_slice();
                let mut seq = serializer.serialize_seq(Some(elems.len()))?;
                for elem in elems {
                    seq.serialize_element(elem)?;
                }
                seq.end()
            }
            Value::EMPTY_OBJECT | Value::OBJECT => {
                let pairs = self.pairs();
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, val) in pairs {
                    map.serialize_entry(key.str_slice(), val)?;
                }
                map.end()
            }
            _ => unreachable!("corrupt discriminant"),
        }
    }
}

impl Serialize for Object {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl Serialize for Array {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Convert a `T` into a `Value`.
///
/// # Example
///
/// ```
/// use serde::Serialize;
/// use dynjson::{json, to_value, Value};
///
/// #[derive(Serialize)]
/// struct User {
///     name: String,
///     id: u64,
/// }
///
/// let user = User {
///     name: "alice".into(),
///     id: 42,
/// };
/// assert_eq!(
///     to_value(&user).unwrap(),
///     json!({"name": "alice", "id": 42})
/// );
/// ```
///
/// # Errors
///
/// The conversion fails if `T`'s `Serialize` implementation decides to fail,
/// if `T` contains a map with non-string keys, or if `T` contains a NaN or
/// infinite float, neither of which has a JSON representation.
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(Serializer)
}

// Not exported; mainly the expression path of `json!`.
pub(crate) struct Serializer;

impl serde::Serializer for Serializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    #[inline]
    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::new_null())
    }

    #[inline]
    fn serialize_bool(self, value: bool) -> Result<Value> {
        Ok(Value::new_bool(value))
    }

    #[inline]
    fn serialize_i8(self, value: i8) -> Result<Value> {
        self.serialize_i64(value as i64)
    }

    #[inline]
    fn serialize_i16(self, value: i16) -> Result<Value> {
        self.serialize_i64(value as i64)
    }

    #[inline]
    fn serialize_i32(self, value: i32) -> Result<Value> {
        self.serialize_i64(value as i64)
    }

    #[inline]
    fn serialize_i64(self, value: i64) -> Result<Value> {
        Ok(Value::new_i64(value))
    }

    fn serialize_i128(self, value: i128) -> Result<Value> {
        if let Ok(value) = u64::try_from(value) {
            Ok(Value::new_u64(value))
        } else if let Ok(value) = i64::try_from(value) {
            Ok(Value::new_i64(value))
        } else {
            Err(Error::invalid_number(&value.to_string()))
        }
    }

    #[inline]
    fn serialize_u8(self, value: u8) -> Result<Value> {
        self.serialize_u64(value as u64)
    }

    #[inline]
    fn serialize_u16(self, value: u16) -> Result<Value> {
        self.serialize_u64(value as u64)
    }

    #[inline]
    fn serialize_u32(self, value: u32) -> Result<Value> {
        self.serialize_u64(value as u64)
    }

    #[inline]
    fn serialize_u64(self, value: u64) -> Result<Value> {
        Ok(Value::new_u64(value))
    }

    fn serialize_u128(self, value: u128) -> Result<Value> {
        if let Ok(value) = u64::try_from(value) {
            Ok(Value::new_u64(value))
        } else {
            Err(Error::invalid_number(&value.to_string()))
        }
    }

    #[inline]
    fn serialize_f32(self, value: f32) -> Result<Value> {
        self.serialize_f64(value as f64)
    }

    #[inline]
    fn serialize_f64(self, value: f64) -> Result<Value> {
        Value::new_f64(value).ok_or_else(|| Error::invalid_number(&value.to_string()))
    }

    #[inline]
    fn serialize_char(self, value: char) -> Result<Value> {
        let mut buf = [0u8; 4];
        Ok(Value::copy_str(value.encode_utf8(&mut buf)))
    }

    #[inline]
    fn serialize_str(self, value: &str) -> Result<Value> {
        Ok(Value::copy_str(value))
    }

    /// Bytes become an array of numbers.
    fn serialize_bytes(self, value: &[u8]) -> Result<Value> {
        Ok(Value::from_vec(
            value.iter().map(|b| Value::new_u64(*b as u64)).collect(),
        ))
    }

    #[inline]
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        self.serialize_unit()
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        self.serialize_str(variant)
    }

    #[inline]
    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut object = Value::new_object_with(1);
        object.insert_pair(variant, to_value(value)?);
        Ok(object)
    }

    #[inline]
    fn serialize_none(self) -> Result<Value> {
        self.serialize_unit()
    }

    #[inline]
    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    #[inline]
    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    #[inline]
    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    #[inline]
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    #[inline]
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            static_name: variant,
            vec: Vec::with_capacity(len),
        })
    }

    #[inline]
    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(SerializeMap {
            object: Value::new_object_with(len.unwrap_or_default()),
            next_key: None,
        })
    }

    #[inline]
    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    #[inline]
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(SerializeStructVariant {
            static_name: variant,
            object: Value::new_object_with(len),
        })
    }

    #[inline]
    fn collect_str<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Display,
    {
        self.serialize_str(&value.to_string())
    }
}

pub(crate) struct SerializeVec {
    vec: Vec<Value>,
}

pub(crate) struct SerializeTupleVariant {
    static_name: &'static str,
    vec: Vec<Value>,
}

pub(crate) struct SerializeMap {
    object: Value,
    next_key: Option<Value>,
}

pub(crate) struct SerializeStructVariant {
    static_name: &'static str,
    object: Value,
}

impl serde::ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::from_vec(self.vec))
    }
}

impl serde::ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        serde::ser::SerializeSeq::end(self)
    }
}

impl serde::ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        serde::ser::SerializeSeq::end(self)
    }
}

impl serde::ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut object = Value::new_object_with(1);
        object.insert_pair(self.static_name, Value::from_vec(self.vec));
        Ok(object)
    }
}

impl serde::ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        // Panic because a missing key indicates a bug in the caller's
        // `Serialize` implementation rather than an expected failure.
        let key = self
            .next_key
            .take()
            .expect("serialize_value called before serialize_key");
        self.object.insert_key_value(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.object)
    }
}

impl serde::ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.object.insert_pair(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.object)
    }
}

impl serde::ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.object.insert_pair(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut wrapper = Value::new_object_with(1);
        wrapper.insert_pair(self.static_name, self.object);
        Ok(wrapper)
    }
}

fn key_must_be_a_string() -> Error {
    Error::Custom("map key must be a string or an integer".to_string())
}

/// Serializes map keys, which must render as strings. Integer and boolean
/// keys are stringified the way JSON maps conventionally spell them.
struct MapKeySerializer;

macro_rules! serialize_integer_key {
    ($($method:ident => $ty:ty)*) => {
        $(
            fn $method(self, value: $ty) -> Result<Value> {
                let mut buf = itoa::Buffer::new();
                Ok(Value::copy_str(buf.format(value)))
            }
        )*
    }
}

impl serde::Serializer for MapKeySerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = Impossible<Value, Error>;
    type SerializeTuple = Impossible<Value, Error>;
    type SerializeTupleStruct = Impossible<Value, Error>;
    type SerializeTupleVariant = Impossible<Value, Error>;
    type SerializeMap = Impossible<Value, Error>;
    type SerializeStruct = Impossible<Value, Error>;
    type SerializeStructVariant = Impossible<Value, Error>;

    #[inline]
    fn serialize_str(self, value: &str) -> Result<Value> {
        Ok(Value::copy_str(value))
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::copy_str(variant))
    }

    #[inline]
    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    serialize_integer_key! {
        serialize_i8 => i8
        serialize_i16 => i16
        serialize_i32 => i32
        serialize_i64 => i64
        serialize_u8 => u8
        serialize_u16 => u16
        serialize_u32 => u32
        serialize_u64 => u64
    }

    fn serialize_bool(self, value: bool) -> Result<Value> {
        Ok(Value::copy_str(if value { "true" } else { "false" }))
    }

    fn serialize_char(self, value: char) -> Result<Value> {
        let mut buf = [0u8; 4];
        Ok(Value::copy_str(value.encode_utf8(&mut buf)))
    }

    fn serialize_f32(self, _value: f32) -> Result<Value> {
        Err(key_must_be_a_string())
    }

    fn serialize_f64(self, _value: f64) -> Result<Value> {
        Err(key_must_be_a_string())
    }

    fn serialize_bytes(self, _value: &[u8]) -> Result<Value> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit(self) -> Result<Value> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Err(key_must_be_a_string())
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_none(self) -> Result<Value> {
        Err(key_must_be_a_string())
    }

    fn serialize_some<T>(self, _value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_must_be_a_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_must_be_a_string())
    }

    fn collect_str<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Display,
    {
        Ok(Value::copy_str(&value.to_string()))
    }
}

/// Serialize a [`Value`] to a compact JSON string.
///
/// Integers print through `itoa`. Doubles print in the shortest form that
/// round-trips, unless the value carries a precision hint
/// ([`Value::new_f64_with_precision`]), which fixes the number of decimal
/// places instead.
///
/// ```
/// use dynjson::json;
///
/// let v = json!({"a": [1, true, "x\n"]});
/// assert_eq!(dynjson::to_string(&v), r#"{"a":[1,true,"x\n"]}"#);
/// ```
pub fn to_string(value: &Value) -> String {
    let mut out = String::with_capacity(32);
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value.tag() {
        Value::NULL => out.push_str("null"),
        Value::EMPTY_OBJECT => out.push_str("{}"),
        Value::BOOL => out.push_str(if value.bool() { "true" } else { "false" }),
        Value::SIGNED => {
            let mut buf = itoa::Buffer::new();
            out.push_str(buf.format(value.i64()));
        }
        Value::UNSIGNED => {
            let mut buf = itoa::Buffer::new();
            out.push_str(buf.format(value.u64()));
        }
        Value::DOUBLE => match value.precision() {
            Some(precision) => {
                // Writing into a String cannot fail.
                let _ = write!(out, "{:.*}", precision as usize, value.f64());
            }
            None => {
                let mut buf = ryu::Buffer::new();
                out.push_str(buf.format_finite(value.f64()));
            }
        },
        Value::SHORT_STR | Value::STRING => write_escaped(out, value.str_slice()),
        Value::ARRAY => {
            out.push('[');
            for (i, elem) in value.as_slice().iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, elem);
            }
            out.push(']');
        }
        Value::OBJECT => {
            out.push('{');
            for (i, (key, val)) in value.pairs().iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_escaped(out, key.str_slice());
                out.push(':');
                write_value(out, val);
            }
            out.push('}');
        }
        _ => unreachable!("corrupt discriminant"),
    }
}

fn write_escaped(out: &mut String, s: &str) {
    out.push('"');
    let mut start = 0;
    for (i, byte) in s.bytes().enumerate() {
        let escape = match byte {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            0x08 => "\\b",
            0x0c => "\\f",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x00..=0x1f => "",
            _ => continue,
        };
        out.push_str(&s[start..i]);
        if escape.is_empty() {
            let _ = write!(out, "\\u{byte:04x}");
        } else {
            out.push_str(escape);
        }
        start = i + 1;
    }
    out.push_str(&s[start..]);
    out.push('"');
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_string(self))
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Display for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use serde::Serialize;

    use super::*;
    use crate::json;

    #[test]
    fn test_to_string_scalars() {
        assert_eq!(to_string(&Value::new_null()), "null");
        assert_eq!(to_string(&Value::new()), "{}");
        assert_eq!(to_string(&Value::new_bool(false)), "false");
        assert_eq!(to_string(&Value::new_i64(-42)), "-42");
        assert_eq!(to_string(&Value::new_u64(42)), "42");
        assert_eq!(to_string(&Value::new_f64(1.5).unwrap()), "1.5");
        assert_eq!(to_string(&Value::new_f64(3.0).unwrap()), "3.0");
    }

    #[test]
    fn test_to_string_escapes() {
        assert_eq!(
            to_string(&Value::copy_str("a\"b\\c\nd\u{1}")),
            r#""a\"b\\c\nd\u0001""#
        );
        // Multi-byte characters pass through unescaped.
        assert_eq!(to_string(&Value::copy_str("héllo")), "\"héllo\"");
    }

    #[test]
    fn test_to_string_containers() {
        let v = json!({"a": [1, null, "s"], "b": {}});
        assert_eq!(to_string(&v), r#"{"a":[1,null,"s"],"b":{}}"#);
    }

    #[test]
    fn test_precision_formatting() {
        let v = Value::new_f64_with_precision(2.0 / 3.0, 4).unwrap();
        assert_eq!(to_string(&v), "0.6667");
    }

    #[test]
    fn test_serialize_matches_serde_json() {
        let v = json!({"a": [1, true, null], "s": "x"});
        let via_serde = serde_json::to_string(&v).unwrap();
        assert_eq!(via_serde, to_string(&v));
    }

    #[test]
    fn test_to_value_struct() {
        #[derive(Serialize)]
        struct User {
            name: String,
            id: u64,
            tags: Vec<&'static str>,
        }

        let user = User {
            name: "alice".into(),
            id: 42,
            tags: vec!["a", "b"],
        };
        let got = to_value(&user).unwrap();
        assert_eq!(got, json!({"name": "alice", "id": 42, "tags": ["a", "b"]}));
    }

    #[test]
    fn test_to_value_map_keys() {
        let mut map = BTreeMap::new();
        map.insert(1u32, "one");
        assert_eq!(to_value(&map).unwrap(), json!({"1": "one"}));

        let mut bad = BTreeMap::new();
        bad.insert(vec![1, 2], "x");
        assert!(to_value(&bad).is_err());
    }

    #[test]
    fn test_to_value_rejects_nan() {
        assert!(to_value(&f64::NAN).is_err());
        assert!(to_value(&1.5f64).is_ok());
    }
}
