use super::node::{key_position, Value};
use super::object::DEFAULT_OBJ_CAP;
use super::value_trait::{JsonType, JsonValueTrait};

impl<I> std::ops::Index<I> for Value
where
    I: Index,
{
    type Output = Value;

    /// Index into an array `Value` using the syntax `value[0]` and into an
    /// object `Value` using the syntax `value["k"]`.
    ///
    /// Returns a null `Value` if the `Value` type does not match the index, or
    /// the index does not exist in the array or object.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynjson::json;
    ///
    /// let data = json!({
    ///     "x": {
    ///         "y": ["z", "zz"]
    ///     }
    /// });
    ///
    /// assert_eq!(data["x"]["y"], json!(["z", "zz"]));
    /// assert_eq!(data["x"]["y"][0], json!("z"));
    ///
    /// assert_eq!(data["a"], json!(null)); // returns null for undefined values
    /// assert_eq!(data["a"]["b"], json!(null)); // does not panic
    /// ```
    #[inline]
    fn index(&self, index: I) -> &Value {
        static NULL: Value = Value::new_null();
        index.value_index_into(self).unwrap_or(&NULL)
    }
}

impl<I: Index> std::ops::IndexMut<I> for Value {
    /// Write through the index of a mutable `Value`, using the syntax
    /// `value[0] = ...` in an array and `value["k"] = ...` in an object.
    ///
    /// If the index is a number, the value must be an array longer than the
    /// index; anything else panics.
    ///
    /// If the index is a string, the value must be in an object state. An
    /// empty-object sentinel is materialized into a real object here, and a
    /// missing key is inserted as a fresh empty object so that deeply nested
    /// keys can be built up by assignment. Indexing into a value that is not
    /// an object panics.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynjson::{json, Value};
    ///
    /// let mut data = json!({ "x": 0 });
    ///
    /// // replace an existing key
    /// data["x"] = json!(1);
    ///
    /// // insert a new key
    /// data["y"] = json!([1, 2, 3]);
    ///
    /// // replace an array value
    /// data["y"][0] = json!(true);
    ///
    /// // insert a deeply nested key; each level starts as an empty object
    /// data["a"]["b"]["c"] = json!(true);
    ///
    /// assert_eq!(
    ///     data,
    ///     json!({"x": 1, "y": [true, 2, 3], "a": {"b": {"c": true}}})
    /// );
    /// ```
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Value {
        index.index_or_insert(self)
    }
}

/// An indexing trait for `Value`, sealed over `usize` and string types.
pub trait Index: private::Sealed {
    /// Return None if the index is not already in the array or object.
    #[doc(hidden)]
    fn value_index_into<'v>(&self, v: &'v Value) -> Option<&'v Value>;

    /// Return None if the index is not already in the array or object.
    #[doc(hidden)]
    fn index_into_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value>;

    /// Panic if the array index is out of bounds. If the key is not already
    /// in the object, insert it as an empty object; an empty-object sentinel
    /// first becomes a real object. Panic on any other value type.
    #[doc(hidden)]
    fn index_or_insert<'v>(&self, v: &'v mut Value) -> &'v mut Value;
}

impl Index for usize {
    fn value_index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        v.get_index(*self)
    }

    fn index_into_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
        v.get_index_mut(*self)
    }

    fn index_or_insert<'v>(&self, v: &'v mut Value) -> &'v mut Value {
        let typ = v.get_type();
        if typ != JsonType::Array {
            panic!("cannot access index in non-array value type {typ}");
        }
        let len = v.len();
        v.get_index_mut(*self)
            .unwrap_or_else(|| panic!("index {self} out of bounds (len: {len})"))
    }
}

impl Index for str {
    fn value_index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        v.get_key(self)
    }

    fn index_into_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
        v.get_key_mut(self)
    }

    fn index_or_insert<'v>(&self, v: &'v mut Value) -> &'v mut Value {
        if v.get_type() != JsonType::Object {
            panic!("cannot access key in non-object value type {}", v.get_type());
        }
        // Materializes the empty-object sentinel; this is the point where the
        // deferred `{}` allocation pays off.
        let pairs = v.materialize_object(DEFAULT_OBJ_CAP);
        match key_position(pairs, self) {
            Ok(i) => &mut pairs[i].1,
            Err(i) => {
                pairs.insert(i, (Value::copy_str(self), Value::new()));
                &mut pairs[i].1
            }
        }
    }
}

impl Index for String {
    fn value_index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        self.as_str().value_index_into(v)
    }

    fn index_into_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
        self.as_str().index_into_mut(v)
    }

    fn index_or_insert<'v>(&self, v: &'v mut Value) -> &'v mut Value {
        self.as_str().index_or_insert(v)
    }
}

impl<T> Index for &T
where
    T: ?Sized + Index,
{
    fn value_index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        (**self).value_index_into(v)
    }

    fn index_into_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
        (**self).index_into_mut(v)
    }

    fn index_or_insert<'v>(&self, v: &'v mut Value) -> &'v mut Value {
        (**self).index_or_insert(v)
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl<T: ?Sized + Sealed> Sealed for &T {}
}

#[cfg(test)]
mod test {
    use crate::{json, JsonValueTrait, Value};

    #[test]
    fn test_index_miss_is_null() {
        let v = json!({"a": [1]});
        assert!(v["missing"].is_null());
        assert!(v["a"][9].is_null());
        assert!(v[0].is_null()); // wrong index kind
    }

    #[test]
    fn test_index_mut_builds_nested_objects() {
        let mut v = Value::new();
        v["a"]["b"] = json!(7);
        assert_eq!(v["a"]["b"].as_i64(), Some(7));
        // Each intermediate level was inserted as an empty-object sentinel
        // and materialized by the next keyed write.
        assert!(v["a"].is_object());
    }

    #[test]
    #[should_panic(expected = "non-array")]
    fn test_index_mut_wrong_type_panics() {
        let mut v = json!("scalar");
        v[0] = json!(1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_mut_out_of_bounds_panics() {
        let mut v = json!([1]);
        v[3] = json!(1);
    }
}
