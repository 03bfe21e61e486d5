//! Represents a JSON array.

use std::ops::{Deref, DerefMut};

use ref_cast::RefCast;

use super::node::Value;

/// Represents a JSON array: a view over a [`Value`] in the array state.
///
/// `Array` dereferences to `[Value]`, so the whole slice API (indexing,
/// iteration, `first`/`last`, sorting) is available on it directly.
///
/// # Examples
/// ```
/// use dynjson::{array, json, Value};
///
/// let mut arr = array![1, 2, 3];
/// arr.push(Value::new_bool(true));
/// assert_eq!(arr.len(), 4);
/// assert_eq!(arr[0], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, RefCast)]
#[repr(transparent)]
pub struct Array(pub(crate) Value);

impl Default for Array {
    fn default() -> Self {
        Self::new()
    }
}

impl Array {
    /// Create a new empty array.
    #[inline]
    pub fn new() -> Self {
        Array(Value::new_array())
    }

    /// Create a new empty array with at least the given capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Array(Value::new_array_with(capacity))
    }

    /// Returns the inner [`Value`].
    #[inline]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Returns the element capacity of the allocated storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    /// Appends an element to the back.
    #[inline]
    pub fn push(&mut self, val: Value) {
        self.0.arr_mut().push(val);
    }

    /// Removes the last element and returns it, or [`None`] if empty.
    #[inline]
    pub fn pop(&mut self) -> Option<Value> {
        self.0.arr_mut().pop()
    }

    /// Inserts an element at position `index`, shifting the elements after it
    /// to the right.
    ///
    /// # Panics
    /// Panics if `index > len`.
    #[inline]
    pub fn insert(&mut self, index: usize, val: Value) {
        self.0.arr_mut().insert(index, val);
    }

    /// Removes and returns the element at position `index`, shifting the
    /// elements after it to the left.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn remove(&mut self, index: usize) -> Value {
        self.0.arr_mut().remove(index)
    }

    /// Removes all elements, keeping the allocated storage.
    #[inline]
    pub fn clear(&mut self) {
        self.0.arr_mut().clear();
    }

    /// Shortens the array to `len` elements, dropping the rest.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.0.arr_mut().truncate(len);
    }

    /// Reserves storage for at least `additional` more elements.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.0.arr_mut().reserve(additional);
    }
}

impl Deref for Array {
    type Target = [Value];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl DerefMut for Array {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_slice_mut()
    }
}

impl From<Vec<Value>> for Array {
    #[inline]
    fn from(vec: Vec<Value>) -> Self {
        Array(Value::from_vec(vec))
    }
}

impl<T: Into<Value>> FromIterator<T> for Array {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let vec: Vec<Value> = iter.into_iter().map(Into::into).collect();
        Array(Value::from_vec(vec))
    }
}

impl<T: Into<Value>> Extend<T> for Array {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.arr_mut().extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    #[inline]
    fn into_iter(mut self) -> Self::IntoIter {
        self.0.take_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut Array {
    type Item = &'a mut Value;
    type IntoIter = std::slice::IterMut<'a, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{array, json, JsonValueTrait};

    #[test]
    fn test_array_basics() {
        let mut arr = Array::new();
        assert!(arr.is_empty());
        arr.push(Value::new_i64(1));
        arr.push(Value::copy_str("two"));
        arr.insert(1, Value::new_bool(true));
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.remove(0), 1);
        assert_eq!(arr.pop().unwrap(), "two");
        assert_eq!(arr.pop().unwrap(), true);
        assert_eq!(arr.pop(), None);
    }

    #[test]
    fn test_slice_access() {
        let mut arr = array![1, 2, 3];
        arr[0] = Value::new_i64(10);
        assert_eq!(arr.first().unwrap().as_i64(), Some(10));
        assert_eq!(arr.iter().filter_map(|v| v.as_i64()).sum::<i64>(), 15);
        for v in &mut arr {
            *v = Value::new_null();
        }
        assert!(arr.iter().all(|v| v.is_null()));
    }

    #[test]
    fn test_copy_then_append() {
        // A deep copy stays independent of the source while it grows.
        let source = array![json!({"k": "v"}), 2];
        let mut copy = source.clone();
        copy.extend([3, 4]);
        assert_eq!(source.len(), 2);
        assert_eq!(copy.len(), 4);
        assert_eq!(copy[0], source[0]);
    }

    #[test]
    fn test_from_iter_and_into_iter() {
        let arr: Array = (1..=3).collect();
        let doubled: Array = arr.into_iter().map(|v| v.as_i64().unwrap() * 2).collect();
        assert_eq!(doubled.into_value(), json!([2, 4, 6]));
    }
}
