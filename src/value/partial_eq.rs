use super::{array::Array, node::Value, object::Object, value_trait::JsonValueTrait};

impl Eq for Value {}

impl PartialEq for Value {
    /// Structural equality over the ten storage states.
    ///
    /// Strings compare by content whether inline or heap-allocated; arrays
    /// compare element-wise in order; objects compare by key set and per-key
    /// value, independent of member order. The empty-object sentinel equals a
    /// materialized object with zero members, in both directions. Numbers
    /// compare across storage kinds: signed vs unsigned exactly, integers vs
    /// doubles by conversion to double (magnitudes beyond 2^53 round, a
    /// documented precision boundary, not a bug).
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        match (self.tag(), other.tag()) {
            (Value::NULL, Value::NULL) => true,
            (Value::BOOL, Value::BOOL) => self.bool() == other.bool(),
            (
                Value::SIGNED | Value::UNSIGNED | Value::DOUBLE,
                Value::SIGNED | Value::UNSIGNED | Value::DOUBLE,
            ) => eq_number(self, other),
            (Value::SHORT_STR | Value::STRING, Value::SHORT_STR | Value::STRING) => {
                self.str_slice() == other.str_slice()
            }
            (Value::EMPTY_OBJECT | Value::OBJECT, Value::EMPTY_OBJECT | Value::OBJECT) => {
                eq_object(self, other)
            }
            (Value::ARRAY, Value::ARRAY) => self.as_slice() == other.as_slice(),
            _ => false,
        }
    }
}

fn eq_number(a: &Value, b: &Value) -> bool {
    match (a.tag(), b.tag()) {
        (Value::SIGNED, Value::SIGNED) => a.i64() == b.i64(),
        (Value::UNSIGNED, Value::UNSIGNED) => a.u64() == b.u64(),
        (Value::SIGNED, Value::UNSIGNED) => {
            let i = a.i64();
            i >= 0 && i as u64 == b.u64()
        }
        (Value::UNSIGNED, Value::SIGNED) => {
            let i = b.i64();
            i >= 0 && i as u64 == a.u64()
        }
        (Value::DOUBLE, Value::DOUBLE) => a.f64() == b.f64(),
        (Value::SIGNED, Value::DOUBLE) => a.i64() as f64 == b.f64(),
        (Value::DOUBLE, Value::SIGNED) => a.f64() == b.i64() as f64,
        (Value::UNSIGNED, Value::DOUBLE) => a.u64() as f64 == b.f64(),
        (Value::DOUBLE, Value::UNSIGNED) => a.f64() == b.u64() as f64,
        _ => unreachable!("not numbers"),
    }
}

fn eq_object(a: &Value, b: &Value) -> bool {
    // pairs() is empty for the sentinel, which makes `{}` equal to a
    // materialized object with zero members.
    let ours = a.pairs();
    if ours.len() != b.len() {
        return false;
    }
    // Keys are unique, so equal length plus one-directional containment is
    // enough; lookup keeps this order-independent between the sorted and
    // insertion-ordered policies.
    ours.iter()
        .all(|(k, v)| b.get_key(k.str_slice()).is_some_and(|bv| v == bv))
}

#[inline]
fn eq_i64(value: &Value, other: i64) -> bool {
    value.as_i64() == Some(other)
}

#[inline]
fn eq_u64(value: &Value, other: u64) -> bool {
    value.as_u64() == Some(other)
}

#[inline]
fn eq_f64(value: &Value, other: f64) -> bool {
    value.as_f64() == Some(other)
}

#[inline]
fn eq_bool(value: &Value, other: bool) -> bool {
    value.as_bool() == Some(other)
}

#[inline]
fn eq_str(value: &Value, other: &str) -> bool {
    value.as_str() == Some(other)
}

macro_rules! impl_str_eq {
    ($($ty:ty)*) => {
        $(
            impl PartialEq<$ty> for Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    let s: &str = other.as_ref();
                    eq_str(self, s)
                }
            }

            impl PartialEq<Value> for $ty {
                #[inline]
                fn eq(&self, other: &Value) -> bool {
                    let s: &str = self.as_ref();
                    eq_str(other, s)
                }
            }

            impl PartialEq<$ty> for &Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    let s: &str = other.as_ref();
                    eq_str(*self, s)
                }
            }

            impl PartialEq<$ty> for &mut Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    let s: &str = other.as_ref();
                    eq_str(*self, s)
                }
            }
        )*
    }
}

impl_str_eq! { str String }

impl PartialEq<&str> for Value {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        eq_str(self, other)
    }
}

impl PartialEq<Value> for &str {
    #[inline]
    fn eq(&self, other: &Value) -> bool {
        eq_str(other, self)
    }
}

macro_rules! impl_numeric_eq {
    ($($eq:ident [$($ty:ty)*])*) => {
        $($(
            impl PartialEq<$ty> for Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    $eq(self, *other as _)
                }
            }

            impl PartialEq<Value> for $ty {
                #[inline]
                fn eq(&self, other: &Value) -> bool {
                    $eq(other, *self as _)
                }
            }

            impl PartialEq<$ty> for &Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    $eq(*self, *other as _)
                }
            }

            impl PartialEq<$ty> for &mut Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    $eq(*self, *other as _)
                }
            }
        )*)*
    }
}

impl_numeric_eq! {
    eq_i64[i8 i16 i32 i64 isize]
    eq_u64[u8 u16 u32 u64 usize]
    eq_f64[f32 f64]
    eq_bool[bool]
}

macro_rules! impl_container_eq {
    ($($ty:ty)*) => {
        $(
            impl PartialEq<$ty> for Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    self == &other.0
                }
            }

            impl PartialEq<Value> for $ty {
                #[inline]
                fn eq(&self, other: &Value) -> bool {
                    other == &self.0
                }
            }

            impl PartialEq<$ty> for &Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    *self == &other.0
                }
            }

            impl PartialEq<Value> for &$ty {
                #[inline]
                fn eq(&self, other: &Value) -> bool {
                    other == &self.0
                }
            }
        )*
    }
}

impl_container_eq!(Array Object);

#[cfg(test)]
mod test {
    use crate::{json, Value};

    #[test]
    fn test_cross_kind_numeric_eq() {
        assert_eq!(Value::new_i64(5), Value::new_u64(5));
        assert_eq!(Value::new_u64(5), Value::new_i64(5));
        // -1 never equals any unsigned value.
        assert_ne!(Value::new_i64(-1), Value::new_u64(u64::MAX));
        assert_ne!(Value::new_i64(-1), Value::new_u64(0));

        assert_eq!(Value::new_i64(2), Value::new_f64(2.0).unwrap());
        assert_eq!(Value::new_f64(2.0).unwrap(), Value::new_u64(2));
        assert_ne!(Value::new_i64(2), Value::new_f64(2.5).unwrap());
    }

    #[test]
    fn test_empty_object_equivalence() {
        let sentinel = Value::new();
        let materialized = Value::new_object_with(4);
        assert_eq!(sentinel, materialized);
        assert_eq!(materialized, sentinel);

        let mut filled = Value::new_object_with(1);
        filled.insert_pair("a", Value::new_null());
        assert_ne!(sentinel, filled);
    }

    #[test]
    fn test_string_eq_ignores_representation() {
        let inline = Value::copy_str("hello");
        // Same content, forced to the heap via a long intermediate is not
        // possible; compare inline vs heap with distinct lengths instead.
        let heap = Value::copy_str("hello world, long enough for the heap");
        assert_ne!(inline, heap);
        assert_eq!(inline, Value::copy_str("hello"));
        assert_eq!(inline, "hello");
        assert_eq!("hello", inline);
    }

    #[test]
    fn test_object_eq_order_independent() {
        let a = json!({"x": 1, "y": [true]});
        let b = json!({"y": [true], "x": 1});
        assert_eq!(a, b);
        assert_ne!(a, json!({"x": 1}));
        assert_ne!(a, json!({"x": 1, "y": [false]}));
    }

    #[test]
    fn test_cross_kind_unequal() {
        assert_ne!(json!("1"), json!(1));
        assert_ne!(json!([1]), json!({"0": 1}));
        assert_ne!(json!(null), json!(false));
        assert_ne!(json!(0), json!(false));
    }

    #[test]
    fn test_primitive_eq_grid() {
        assert_eq!(json!(1), 1u8);
        assert_eq!(1i32, json!(1));
        assert_eq!(json!(1.5), 1.5f64);
        assert_eq!(json!(true), true);
        assert_eq!(json!("s"), "s");
        assert_eq!(json!("s"), "s".to_string());
    }
}
