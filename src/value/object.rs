//! Represents a JSON object.

use std::iter::FusedIterator;

use ref_cast::RefCast;

use super::node::{key_position, Value};

/// One object member: an owned string key and its value.
#[doc(hidden)]
pub type Pair = (Value, Value);

pub(crate) const DEFAULT_OBJ_CAP: usize = 8;

/// Represents a JSON object: a view over a [`Value`] in either object state.
///
/// The inner implementation is a key-value array. By default its order is the
/// insertion order; with the `sort_keys` feature members are kept sorted by
/// key. Keys are unique: inserting an existing key replaces its value.
///
/// # Examples
/// ```
/// use dynjson::{object, Object};
///
/// let mut obj = object! {"a": 1, "b": true, "c": null};
///
/// assert_eq!(obj["a"], 1);
/// assert_eq!(obj.insert("d", "e"), None);
/// assert_eq!(obj["d"], "e");
/// assert_eq!(obj.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, RefCast)]
#[repr(transparent)]
pub struct Object(pub(crate) Value);

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl Object {
    /// Create a new empty object.
    ///
    /// No storage is allocated until the first member is inserted: the inner
    /// value starts in the empty-object sentinel state.
    #[inline]
    pub const fn new() -> Self {
        Object(Value::new())
    }

    /// Create a new empty object with storage for at least `capacity`
    /// members. This allocates eagerly.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Object(Value::new_object_with(capacity))
    }

    /// Returns the inner [`Value`].
    #[inline]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Returns the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.pairs().len()
    }

    /// Returns true if the object has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the member capacity of the allocated storage, 0 for the
    /// sentinel.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    /// Removes all members, keeping the allocated storage.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Reserves storage for at least `additional` more members.
    pub fn reserve(&mut self, additional: usize) {
        let len = self.len();
        self.0.materialize_object(len + additional).reserve(additional);
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynjson::{object, JsonValueTrait};
    ///
    /// let obj = object! {"a": 1, "b": true};
    /// assert_eq!(obj.get("a").unwrap(), 1);
    /// assert_eq!(obj.get("z"), None);
    /// ```
    #[inline]
    pub fn get<Q: AsRef<str> + ?Sized>(&self, key: &Q) -> Option<&Value> {
        self.0.get_key(key.as_ref())
    }

    /// Returns true if the object contains a value for the specified key.
    #[inline]
    pub fn contains_key<Q: AsRef<str> + ?Sized>(&self, key: &Q) -> bool {
        self.get(key).is_some()
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut<Q: AsRef<str> + ?Sized>(&mut self, key: &Q) -> Option<&mut Value> {
        self.0.get_key_mut(key.as_ref())
    }

    /// Returns the key-value pair corresponding to the supplied key.
    #[inline]
    pub fn get_key_value<Q: AsRef<str> + ?Sized>(&self, key: &Q) -> Option<(&str, &Value)> {
        self.0.get_key_value(key.as_ref())
    }

    /// Inserts a key-value pair into the object, materializing the sentinel
    /// if needed. The `Value` is converted from `V`.
    ///
    /// If the object did not have this key present, [`None`] is returned.
    /// Otherwise the value is updated and the old value returned; the stored
    /// key is not replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynjson::object;
    ///
    /// let mut obj = object! {"a": 1};
    /// assert_eq!(obj.insert("d", "e"), None);
    /// assert_eq!(obj.insert("d", "f").unwrap(), "e");
    /// assert_eq!(obj["d"], "f");
    /// ```
    #[inline]
    pub fn insert<K: AsRef<str> + ?Sized, V: Into<Value>>(
        &mut self,
        key: &K,
        value: V,
    ) -> Option<Value> {
        self.0.insert_pair(key.as_ref(), value.into())
    }

    /// Removes a key from the object, returning its value if it was present.
    /// The order of the remaining members is preserved.
    #[inline]
    pub fn remove<Q: AsRef<str> + ?Sized>(&mut self, key: &Q) -> Option<Value> {
        self.0.remove_key(key.as_ref())
    }

    /// Gets the given key's corresponding entry for in-place manipulation.
    ///
    /// `entry(key).or_insert(v)` inserts `v` only if the key is absent and
    /// returns a mutable reference to the stored value either way. Calling
    /// `entry` materializes the empty-object sentinel.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynjson::{Object, Value};
    ///
    /// let mut obj = Object::new();
    /// obj.entry("counter").or_insert(Value::new_i64(1));
    /// *obj.entry("counter").or_insert(Value::new_i64(0)) = Value::new_i64(2);
    /// assert_eq!(obj["counter"], 2);
    /// ```
    pub fn entry<'a, K: AsRef<str> + ?Sized>(&'a mut self, key: &K) -> Entry<'a> {
        let key = key.as_ref();
        let pairs = self.0.materialize_object(DEFAULT_OBJ_CAP);
        match key_position(pairs, key) {
            Ok(index) => Entry::Occupied(OccupiedEntry { pairs, index }),
            Err(slot) => Entry::Vacant(VacantEntry {
                pairs,
                key: key.to_string(),
                slot,
            }),
        }
    }

    /// An iterator over the members as `(&str, &Value)` pairs. Iterating the
    /// sentinel yields an empty range without allocating.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.0.pairs().iter())
    }

    /// An iterator over the members with mutable values.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_> {
        IterMut(self.0.pairs_mut().iter_mut())
    }

    /// An iterator over the keys.
    #[inline]
    pub fn keys(&self) -> Keys<'_> {
        Keys(self.0.pairs().iter())
    }

    /// An iterator over the values.
    #[inline]
    pub fn values(&self) -> Values<'_> {
        Values(self.0.pairs().iter())
    }
}

impl<Q: AsRef<str> + ?Sized> std::ops::Index<&Q> for Object {
    type Output = Value;

    /// Returns a null value for a missing key, like indexing a `Value`.
    #[inline]
    fn index(&self, key: &Q) -> &Value {
        &self.0[key.as_ref()]
    }
}

impl<Q: AsRef<str> + ?Sized> std::ops::IndexMut<&Q> for Object {
    #[inline]
    fn index_mut(&mut self, key: &Q) -> &mut Value {
        &mut self.0[key.as_ref()]
    }
}

/// A view into a single entry in an object, which may be vacant or occupied.
pub enum Entry<'a> {
    Occupied(OccupiedEntry<'a>),
    Vacant(VacantEntry<'a>),
}

/// An occupied entry: the key is present.
pub struct OccupiedEntry<'a> {
    pairs: &'a mut Vec<Pair>,
    index: usize,
}

/// A vacant entry: the key is absent, with its insertion slot resolved.
pub struct VacantEntry<'a> {
    pairs: &'a mut Vec<Pair>,
    key: String,
    slot: usize,
}

impl<'a> Entry<'a> {
    /// Returns the entry's key.
    pub fn key(&self) -> &str {
        match self {
            Entry::Occupied(e) => e.key(),
            Entry::Vacant(e) => e.key(),
        }
    }

    /// Inserts `default` if the entry is vacant; returns a mutable reference
    /// to the stored value.
    pub fn or_insert(self, default: Value) -> &'a mut Value {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(default),
        }
    }

    /// Like [`Entry::or_insert`], computing the default only when needed.
    pub fn or_insert_with<F: FnOnce() -> Value>(self, default: F) -> &'a mut Value {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(default()),
        }
    }

    /// Mutates the value if the entry is occupied.
    pub fn and_modify<F: FnOnce(&mut Value)>(self, f: F) -> Self {
        match self {
            Entry::Occupied(mut e) => {
                f(e.get_mut());
                Entry::Occupied(e)
            }
            vacant => vacant,
        }
    }
}

impl<'a> OccupiedEntry<'a> {
    pub fn key(&self) -> &str {
        self.pairs[self.index].0.str_slice()
    }

    pub fn get(&self) -> &Value {
        &self.pairs[self.index].1
    }

    pub fn get_mut(&mut self) -> &mut Value {
        &mut self.pairs[self.index].1
    }

    pub fn into_mut(self) -> &'a mut Value {
        &mut self.pairs[self.index].1
    }

    /// Replaces the stored value, returning the old one.
    pub fn insert(&mut self, value: Value) -> Value {
        std::mem::replace(self.get_mut(), value)
    }

    /// Removes the member, returning its value and preserving the order of
    /// the remaining members.
    pub fn remove(self) -> Value {
        self.pairs.remove(self.index).1
    }
}

impl<'a> VacantEntry<'a> {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Inserts the value at the resolved slot.
    pub fn insert(self, value: Value) -> &'a mut Value {
        self.pairs
            .insert(self.slot, (Value::copy_str(&self.key), value));
        &mut self.pairs[self.slot].1
    }
}

/// An iterator over an object's `(&str, &Value)` members.
pub struct Iter<'a>(std::slice::Iter<'a, Pair>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.str_slice(), v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

/// An iterator over an object's members with mutable values.
pub struct IterMut<'a>(std::slice::IterMut<'a, Pair>);

impl<'a> Iterator for IterMut<'a> {
    type Item = (&'a str, &'a mut Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.str_slice(), v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for IterMut<'_> {}
impl FusedIterator for IterMut<'_> {}

/// An iterator over an object's keys.
pub struct Keys<'a>(std::slice::Iter<'a, Pair>);

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k.str_slice())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}
impl FusedIterator for Keys<'_> {}

/// An iterator over an object's values.
pub struct Values<'a>(std::slice::Iter<'a, Pair>);

impl<'a> Iterator for Values<'a> {
    type Item = &'a Value;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Values<'_> {}
impl FusedIterator for Values<'_> {}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut Object {
    type Item = (&'a str, &'a mut Value);
    type IntoIter = IterMut<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut obj = Object::new();
        for (k, v) in iter {
            obj.insert(k.as_ref(), v);
        }
        obj
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{json, object, Value};

    #[test]
    fn test_object_basics() {
        let mut obj = Object::new();
        assert!(obj.is_empty());
        assert_eq!(obj.capacity(), 0);

        assert_eq!(obj.insert("a", 1), None);
        assert_eq!(obj.insert("b", "two"), None);
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("a"));
        assert_eq!(obj.insert("a", 10).unwrap(), 1);
        assert_eq!(obj.len(), 2);

        assert_eq!(obj.remove("a").unwrap(), 10);
        assert!(!obj.contains_key("a"));
        assert_eq!(obj.remove("a"), None);
    }

    #[test]
    fn test_sentinel_reads_do_not_allocate() {
        let obj = Object::new();
        assert_eq!(obj.get("a"), None);
        assert_eq!(obj.iter().count(), 0);
        assert_eq!(obj.capacity(), 0);
    }

    #[test]
    fn test_entry() {
        let mut obj = object! {"a": 1};
        assert_eq!(obj.entry("a").key(), "a");
        // try_emplace semantics: keep the existing member.
        obj.entry("a").or_insert(Value::new_i64(9));
        assert_eq!(obj["a"], 1);
        obj.entry("b").or_insert_with(|| Value::new_i64(2));
        assert_eq!(obj["b"], 2);

        obj.entry("a").and_modify(|v| *v = Value::new_i64(5));
        assert_eq!(obj["a"], 5);

        if let Entry::Occupied(e) = obj.entry("b") {
            assert_eq!(e.remove(), 2);
        }
        assert!(!obj.contains_key("b"));
    }

    #[cfg(not(feature = "sort_keys"))]
    #[test]
    fn test_insertion_order_preserved() {
        let mut obj = Object::new();
        obj.insert("z", 1);
        obj.insert("a", 2);
        obj.insert("m", 3);
        obj.remove("a");
        let keys: Vec<&str> = obj.keys().collect();
        assert_eq!(keys, ["z", "m"]);
    }

    #[cfg(feature = "sort_keys")]
    #[test]
    fn test_keys_sorted() {
        let mut obj = Object::new();
        obj.insert("z", 1);
        obj.insert("a", 2);
        obj.insert("m", 3);
        let keys: Vec<&str> = obj.keys().collect();
        assert_eq!(keys, ["a", "m", "z"]);
    }

    #[test]
    fn test_iter_mut() {
        let mut obj = object! {"a": 1, "b": 2};
        for (_, v) in obj.iter_mut() {
            let n = v.to_i64().unwrap();
            *v = Value::new_i64(n * 10);
        }
        assert_eq!(obj.into_value(), json!({"a": 10, "b": 20}));
    }

    #[test]
    fn test_from_iter() {
        let obj: Object = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["b"], 2);
    }
}
