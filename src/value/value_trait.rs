use super::index::Index;
use super::node::Value;

/// JsonType is an enum that represents the type of a JSON value.
///
/// The empty-object sentinel and a materialized object both report
/// `JsonType::Object`; the inline and heap string states both report
/// `JsonType::String`. The ten-way storage discriminant stays internal.
///
/// # Examples
/// ```
/// use dynjson::{json, JsonType, JsonValueTrait};
///
/// let json = dynjson::json!({"a": 1, "b": true});
///
/// assert_eq!(json.get("a").unwrap().get_type(), JsonType::Number);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum JsonType {
    Null = 0,
    Boolean = 1,
    Number = 2,
    String = 3,
    Object = 4,
    Array = 5,
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Object => "object",
            JsonType::Array => "array",
        };
        f.write_str(name)
    }
}

/// A trait for inspecting JSON values.
///
/// It is implemented for [`Value`] and, for convenience, for
/// `Option<V>`/`Result<V, E>` so that lookup chains like
/// `value.get("a").get("b").as_i64()` read naturally.
pub trait JsonValueTrait {
    type ValueType<'v>
    where
        Self: 'v;

    /// Gets the type of the value. Returns `JsonType::Null` if `self` is
    /// `Option::None` or `Result::Err(_)`.
    fn get_type(&self) -> JsonType;

    /// Returns true if the value is a `bool`.
    #[inline]
    fn is_boolean(&self) -> bool {
        self.get_type() == JsonType::Boolean
    }

    /// Returns true if the value is true.
    #[inline]
    fn is_true(&self) -> bool {
        self.as_bool().unwrap_or_default()
    }

    /// Returns true if the value is false.
    #[inline]
    fn is_false(&self) -> bool {
        !self.is_true()
    }

    /// Returns true if the value is `null`.
    #[inline]
    fn is_null(&self) -> bool {
        self.get_type() == JsonType::Null
    }

    /// Returns true if the value is a `number`.
    #[inline]
    fn is_number(&self) -> bool {
        self.get_type() == JsonType::Number
    }

    /// Returns true if the value is a `string`.
    #[inline]
    fn is_str(&self) -> bool {
        self.get_type() == JsonType::String
    }

    /// Returns true if the value is an `array`.
    #[inline]
    fn is_array(&self) -> bool {
        self.get_type() == JsonType::Array
    }

    /// Returns true if the value is an `object`, including the unallocated
    /// `{}` sentinel.
    #[inline]
    fn is_object(&self) -> bool {
        self.get_type() == JsonType::Object
    }

    /// Returns true if the value is a number representable as `i64`.
    #[inline]
    fn is_i64(&self) -> bool {
        self.as_i64().is_some()
    }

    /// Returns true if the value is a number representable as `u64`.
    #[inline]
    fn is_u64(&self) -> bool {
        self.as_u64().is_some()
    }

    /// Returns true if the value is stored as a double.
    #[inline]
    fn is_f64(&self) -> bool {
        self.as_f64().is_some()
    }

    /// Returns the `i64` value. A non-negative unsigned value in range also
    /// qualifies; a double does not (use [`Value::to_i64`] for coercion).
    fn as_i64(&self) -> Option<i64>;

    /// Returns the `u64` value, accepting a non-negative signed value.
    fn as_u64(&self) -> Option<u64>;

    /// Returns the `f64` value. Integers convert by value; magnitudes beyond
    /// 2^53 round, the documented precision boundary.
    fn as_f64(&self) -> Option<f64>;

    /// Returns the str if the value is a `string`, whether inline or
    /// heap-allocated.
    fn as_str(&self) -> Option<&str>;

    /// Returns the bool if the value is a `boolean`.
    fn as_bool(&self) -> Option<bool>;

    /// Returns the member for `index` if the value is an `array` or `object`.
    /// The index may be `usize` for arrays or `&str` for objects. Returns
    /// `None` otherwise.
    fn get<I: Index>(&self, index: I) -> Option<Self::ValueType<'_>>;
}

impl JsonValueTrait for Value {
    type ValueType<'v>
        = &'v Value
    where
        Self: 'v;

    #[inline]
    fn get_type(&self) -> JsonType {
        self.json_type()
    }

    fn as_i64(&self) -> Option<i64> {
        match self.tag() {
            Value::SIGNED => Some(self.i64()),
            Value::UNSIGNED => i64::try_from(self.u64()).ok(),
            _ => None,
        }
    }

    fn as_u64(&self) -> Option<u64> {
        match self.tag() {
            Value::UNSIGNED => Some(self.u64()),
            Value::SIGNED => u64::try_from(self.i64()).ok(),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self.tag() {
            Value::DOUBLE => Some(self.f64()),
            Value::SIGNED => Some(self.i64() as f64),
            Value::UNSIGNED => Some(self.u64() as f64),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self.tag() {
            Value::SHORT_STR | Value::STRING => Some(self.str_slice()),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        if self.tag() == Value::BOOL {
            Some(self.bool())
        } else {
            None
        }
    }

    #[inline]
    fn get<I: Index>(&self, index: I) -> Option<Self::ValueType<'_>> {
        index.value_index_into(self)
    }
}

// Helper impls so that lookup chains compose over Option and Result.
impl<V: JsonValueTrait> JsonValueTrait for Option<V> {
    type ValueType<'v>
        = V::ValueType<'v>
    where
        V: 'v,
        Self: 'v;

    fn get_type(&self) -> JsonType {
        self.as_ref().map_or(JsonType::Null, |v| v.get_type())
    }

    fn as_i64(&self) -> Option<i64> {
        self.as_ref().and_then(|v| v.as_i64())
    }

    fn as_u64(&self) -> Option<u64> {
        self.as_ref().and_then(|v| v.as_u64())
    }

    fn as_f64(&self) -> Option<f64> {
        self.as_ref().and_then(|v| v.as_f64())
    }

    fn as_str(&self) -> Option<&str> {
        self.as_ref().and_then(|v| v.as_str())
    }

    fn as_bool(&self) -> Option<bool> {
        self.as_ref().and_then(|v| v.as_bool())
    }

    fn get<I: Index>(&self, index: I) -> Option<Self::ValueType<'_>> {
        self.as_ref().and_then(|v| v.get(index))
    }
}

impl<V: JsonValueTrait, E> JsonValueTrait for Result<V, E> {
    type ValueType<'v>
        = V::ValueType<'v>
    where
        V: 'v,
        Self: 'v;

    fn get_type(&self) -> JsonType {
        self.as_ref().ok().map_or(JsonType::Null, |v| v.get_type())
    }

    fn as_i64(&self) -> Option<i64> {
        self.as_ref().ok().and_then(|v| v.as_i64())
    }

    fn as_u64(&self) -> Option<u64> {
        self.as_ref().ok().and_then(|v| v.as_u64())
    }

    fn as_f64(&self) -> Option<f64> {
        self.as_ref().ok().and_then(|v| v.as_f64())
    }

    fn as_str(&self) -> Option<&str> {
        self.as_ref().ok().and_then(|v| v.as_str())
    }

    fn as_bool(&self) -> Option<bool> {
        self.as_ref().ok().and_then(|v| v.as_bool())
    }

    fn get<I: Index>(&self, index: I) -> Option<Self::ValueType<'_>> {
        self.as_ref().ok().and_then(|v| v.get(index))
    }
}

impl<V: JsonValueTrait> JsonValueTrait for &V {
    type ValueType<'v>
        = V::ValueType<'v>
    where
        V: 'v,
        Self: 'v;

    fn get_type(&self) -> JsonType {
        (*self).get_type()
    }

    fn as_i64(&self) -> Option<i64> {
        (*self).as_i64()
    }

    fn as_u64(&self) -> Option<u64> {
        (*self).as_u64()
    }

    fn as_f64(&self) -> Option<f64> {
        (*self).as_f64()
    }

    fn as_str(&self) -> Option<&str> {
        (*self).as_str()
    }

    fn as_bool(&self) -> Option<bool> {
        (*self).as_bool()
    }

    fn get<I: Index>(&self, index: I) -> Option<Self::ValueType<'_>> {
        (*self).get(index)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::json;

    #[test]
    fn test_chained_lookup() {
        let v = json!({"a": {"b": [1, 2]}, "s": "x", "t": true});
        assert_eq!(v.get("a").get("b").get(1).as_i64(), Some(2));
        assert!(v.get("missing").is_null());
        assert_eq!(v.get("missing").get_type(), JsonType::Null);
        assert_eq!(v.get("s").as_str(), Some("x"));
        assert!(v.get("t").is_true());
    }

    #[test]
    fn test_cross_type_accessors() {
        let u = crate::Value::new_u64(5);
        let i = crate::Value::new_i64(5);
        assert_eq!(u.as_i64(), Some(5));
        assert_eq!(i.as_u64(), Some(5));
        assert_eq!(crate::Value::new_i64(-1).as_u64(), None);
        assert_eq!(crate::Value::new_u64(u64::MAX).as_i64(), None);
        assert_eq!(i.as_f64(), Some(5.0));
        // A double is not silently an integer.
        assert_eq!(crate::Value::new_f64(5.0).unwrap().as_i64(), None);
    }
}
