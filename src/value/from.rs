use std::borrow::Cow;

use super::{array::Array, node::Value, object::Object};

macro_rules! impl_from_signed {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(val: $ty) -> Self {
                    Value::new_i64(val as i64)
                }
            }
        )*
    }
}

macro_rules! impl_from_unsigned {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(val: $ty) -> Self {
                    Value::new_u64(val as u64)
                }
            }
        )*
    }
}

impl_from_signed! { i8 i16 i32 i64 isize }
impl_from_unsigned! { u8 u16 u32 u64 usize }

impl From<bool> for Value {
    #[inline]
    fn from(val: bool) -> Self {
        Value::new_bool(val)
    }
}

impl From<()> for Value {
    /// The unit type converts to `null`.
    #[inline]
    fn from(_: ()) -> Self {
        Value::new_null()
    }
}

impl From<char> for Value {
    #[inline]
    fn from(val: char) -> Self {
        let mut buf = [0u8; 4];
        Value::copy_str(val.encode_utf8(&mut buf))
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(val: &str) -> Self {
        Value::copy_str(val)
    }
}

impl From<&String> for Value {
    #[inline]
    fn from(val: &String) -> Self {
        Value::copy_str(val)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(val: String) -> Self {
        Value::copy_str(&val)
    }
}

impl From<Cow<'_, str>> for Value {
    #[inline]
    fn from(val: Cow<'_, str>) -> Self {
        Value::copy_str(&val)
    }
}

impl From<Array> for Value {
    #[inline]
    fn from(val: Array) -> Self {
        val.into_value()
    }
}

impl From<Object> for Value {
    #[inline]
    fn from(val: Object) -> Self {
        val.into_value()
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(val: Vec<T>) -> Self {
        Value::from_vec(val.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(val: &[T]) -> Self {
        Value::from_vec(val.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    /// `None` converts to `null`.
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => Value::new_null(),
        }
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    /// Collecting into a `Value` builds an array.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::from_vec(iter.into_iter().map(Into::into).collect())
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Value {
    /// Collecting key-value pairs into a `Value` builds an object.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().collect::<Object>().into_value()
    }
}

#[cfg(test)]
mod test {
    use crate::{json, JsonValueTrait, Value};

    #[test]
    fn test_scalar_from() {
        assert_eq!(Value::from(3i8), 3);
        assert_eq!(Value::from(3u64), 3);
        assert_eq!(Value::from(-3i64), -3);
        assert_eq!(Value::from(true), true);
        assert_eq!(Value::from('c'), "c");
        assert_eq!(Value::from("s"), "s");
        assert_eq!(Value::from("s".to_string()), "s");
        assert!(Value::from(()).is_null());
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(Some(1)), 1);
    }

    #[test]
    fn test_container_from() {
        assert_eq!(Value::from(vec![1, 2]), json!([1, 2]));
        assert_eq!(Value::from(&[1, 2][..]), json!([1, 2]));
        let collected: Value = (1..=2).collect();
        assert_eq!(collected, json!([1, 2]));
        let obj: Value = vec![("a", 1)].into_iter().collect();
        assert_eq!(obj, json!({"a": 1}));
    }
}
