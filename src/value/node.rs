//! The tagged storage cell behind [`Value`].
//!
//! Every JSON value lives in one 16-byte cell. The first byte of every payload
//! layout is the discriminant, so the active state can be read through a
//! type-erased view before the payload is interpreted. Strings of up to
//! [`MAX_INLINE_LEN`] bytes are stored inline in the cell; longer strings and
//! all arrays/objects own exactly one heap cell through a raw pointer.

use std::ptr::NonNull;

use ref_cast::RefCast;

use super::{
    array::Array,
    object::{Object, Pair, DEFAULT_OBJ_CAP},
    value_trait::JsonType,
};
use crate::error::{Error, Result};

/// Size of the storage cell shared by all ten states.
pub(crate) const CELL_SIZE: usize = 16;

/// Bytes of the inline string buffer: the cell minus the tag and length bytes.
const INLINE_BUF: usize = CELL_SIZE - 2;

/// Longest string stored inline. One buffer byte stays reserved for the NUL
/// terminator, so a string of exactly this length is inline and one byte more
/// is heap-allocated. This is a hard boundary, not a heuristic.
pub const MAX_INLINE_LEN: usize = INLINE_BUF - 1;

// Every layout spells out its padding so that each constructor initializes the
// full 16 bytes of the cell.

#[repr(C)]
#[derive(Copy, Clone)]
struct TagPayload {
    tag: u8,
    _pad: [u8; 15],
}

#[repr(C)]
#[derive(Copy, Clone)]
struct BoolPayload {
    tag: u8,
    val: bool,
    _pad: [u8; 14],
}

#[repr(C)]
#[derive(Copy, Clone)]
struct I64Payload {
    tag: u8,
    _pad: [u8; 7],
    val: i64,
}

#[repr(C)]
#[derive(Copy, Clone)]
struct U64Payload {
    tag: u8,
    _pad: [u8; 7],
    val: u64,
}

#[repr(C)]
#[derive(Copy, Clone)]
struct F64Payload {
    tag: u8,
    /// Requested decimal precision for serialization, 0 for shortest form.
    precision: u8,
    _pad: [u8; 6],
    val: f64,
}

#[repr(C)]
#[derive(Copy, Clone)]
struct InlineStrPayload {
    tag: u8,
    len: u8,
    /// NUL-terminated: `len <= MAX_INLINE_LEN` keeps the last byte zero.
    buf: [u8; INLINE_BUF],
}

#[repr(C)]
#[derive(Copy, Clone)]
struct StrPayload {
    tag: u8,
    _pad: [u8; 7],
    ptr: NonNull<String>,
}

#[repr(C)]
#[derive(Copy, Clone)]
struct ArrPayload {
    tag: u8,
    _pad: [u8; 7],
    ptr: NonNull<Vec<Value>>,
}

#[repr(C)]
#[derive(Copy, Clone)]
struct ObjPayload {
    tag: u8,
    _pad: [u8; 7],
    ptr: NonNull<Vec<Pair>>,
}

#[repr(C)]
#[derive(Copy, Clone)]
union Cell {
    tag: TagPayload,
    boolean: BoolPayload,
    sint: I64Payload,
    uint: U64Payload,
    dbl: F64Payload,
    inline: InlineStrPayload,
    string: StrPayload,
    array: ArrPayload,
    object: ObjPayload,
}

const _: () = {
    assert!(std::mem::size_of::<Cell>() == CELL_SIZE);
    assert!(std::mem::align_of::<Cell>() == 8);
};

/// A dynamically-typed JSON value.
///
/// `Value` is a 16-byte tagged cell holding exactly one of ten states: null,
/// an empty-object sentinel, bool, i64, u64, f64, an inline string, or an
/// owning pointer to a heap string, array or object. Default construction
/// yields the empty-object sentinel so that a tree can be built up by
/// assignment (`v["a"]["b"] = 1.into()`) without pre-declaring a key set; the
/// first member insert materializes a real object.
///
/// Heap payloads are never shared: [`Clone`] deep-copies them and
/// [`Value::take`] transfers ownership, leaving `null` behind. Concurrent
/// read-only access from several threads is safe; concurrent mutation must be
/// synchronized by the caller.
pub struct Value {
    cell: Cell,
}

// All heap cells are exclusively owned and `&self` access never mutates, the
// same situation as `Box`.
unsafe impl Send for Value {}
unsafe impl Sync for Value {}

impl Value {
    pub(crate) const NULL: u8 = 0;
    pub(crate) const EMPTY_OBJECT: u8 = 1;
    pub(crate) const BOOL: u8 = 2;
    pub(crate) const SIGNED: u8 = 3;
    pub(crate) const UNSIGNED: u8 = 4;
    pub(crate) const DOUBLE: u8 = 5;
    pub(crate) const SHORT_STR: u8 = 6;
    pub(crate) const STRING: u8 = 7;
    pub(crate) const ARRAY: u8 = 8;
    pub(crate) const OBJECT: u8 = 9;

    /// Create a value in the empty-object state.
    ///
    /// No object storage is allocated until the first member is inserted.
    #[inline(always)]
    pub const fn new() -> Self {
        Self::with_tag(Self::EMPTY_OBJECT)
    }

    /// Create a `null` value.
    #[inline(always)]
    pub const fn new_null() -> Self {
        Self::with_tag(Self::NULL)
    }

    #[inline(always)]
    const fn with_tag(tag: u8) -> Self {
        Self {
            cell: Cell {
                tag: TagPayload { tag, _pad: [0; 15] },
            },
        }
    }

    /// Create a boolean value.
    #[inline(always)]
    pub const fn new_bool(val: bool) -> Self {
        Self {
            cell: Cell {
                boolean: BoolPayload {
                    tag: Self::BOOL,
                    val,
                    _pad: [0; 14],
                },
            },
        }
    }

    /// Create a signed integer value.
    #[inline(always)]
    pub const fn new_i64(val: i64) -> Self {
        Self {
            cell: Cell {
                sint: I64Payload {
                    tag: Self::SIGNED,
                    _pad: [0; 7],
                    val,
                },
            },
        }
    }

    /// Create an unsigned integer value.
    #[inline(always)]
    pub const fn new_u64(val: u64) -> Self {
        Self {
            cell: Cell {
                uint: U64Payload {
                    tag: Self::UNSIGNED,
                    _pad: [0; 7],
                    val,
                },
            },
        }
    }

    /// Create a double value, serialized in shortest form. Returns `None` for
    /// NaN or infinity, which are not valid JSON values.
    #[inline(always)]
    pub fn new_f64(val: f64) -> Option<Self> {
        Self::new_f64_with_precision(val, 0)
    }

    /// Create a double value carrying a requested decimal precision used when
    /// serializing. A precision of 0 requests the shortest round-trippable
    /// form. Returns `None` for NaN or infinity.
    #[inline(always)]
    pub fn new_f64_with_precision(val: f64, precision: u8) -> Option<Self> {
        if val.is_finite() {
            Some(Self {
                cell: Cell {
                    dbl: F64Payload {
                        tag: Self::DOUBLE,
                        precision,
                        _pad: [0; 6],
                        val,
                    },
                },
            })
        } else {
            None
        }
    }

    /// Create a double value without checking finiteness.
    ///
    /// # Safety
    /// The f64 must be finite. JSON does not support `NaN` and `Infinity`.
    #[inline(always)]
    pub unsafe fn new_f64_unchecked(val: f64) -> Self {
        Self {
            cell: Cell {
                dbl: F64Payload {
                    tag: Self::DOUBLE,
                    precision: 0,
                    _pad: [0; 6],
                    val,
                },
            },
        }
    }

    /// Create a string value, copying `val`.
    ///
    /// Strings of up to [`MAX_INLINE_LEN`] bytes are stored inline in the
    /// cell; longer strings are heap-allocated. Both are indistinguishable
    /// through [`as_str`][crate::JsonValueTrait::as_str].
    #[inline]
    pub fn copy_str(val: &str) -> Self {
        if val.len() <= MAX_INLINE_LEN {
            let mut buf = [0u8; INLINE_BUF];
            buf[..val.len()].copy_from_slice(val.as_bytes());
            Self {
                cell: Cell {
                    inline: InlineStrPayload {
                        tag: Self::SHORT_STR,
                        len: val.len() as u8,
                        buf,
                    },
                },
            }
        } else {
            Self {
                cell: Cell {
                    string: StrPayload {
                        tag: Self::STRING,
                        _pad: [0; 7],
                        ptr: boxed(val.to_string()),
                    },
                },
            }
        }
    }

    /// Create an empty array value.
    #[inline]
    pub fn new_array() -> Self {
        Self::new_array_with(0)
    }

    /// Create an empty array value with at least the given capacity.
    #[inline]
    pub fn new_array_with(capacity: usize) -> Self {
        Self {
            cell: Cell {
                array: ArrPayload {
                    tag: Self::ARRAY,
                    _pad: [0; 7],
                    ptr: boxed(Vec::with_capacity(capacity)),
                },
            },
        }
    }

    /// Wrap an owned element vector as an array value.
    #[inline]
    pub(crate) fn from_vec(vec: Vec<Value>) -> Self {
        Self {
            cell: Cell {
                array: ArrPayload {
                    tag: Self::ARRAY,
                    _pad: [0; 7],
                    ptr: boxed(vec),
                },
            },
        }
    }

    /// Detach the element vector of an array value, leaving `null`.
    #[inline]
    pub(crate) fn take_vec(&mut self) -> Vec<Value> {
        debug_assert_eq!(self.tag(), Self::ARRAY);
        match self.detach_heap() {
            Some(Heap::Array(vec)) => vec,
            _ => Vec::new(),
        }
    }

    /// Create an object value with storage for at least `capacity` members.
    ///
    /// Unlike [`Value::new`] this allocates eagerly; the result is in the
    /// heap-object state even while empty.
    #[inline]
    pub fn new_object_with(capacity: usize) -> Self {
        Self {
            cell: Cell {
                object: ObjPayload {
                    tag: Self::OBJECT,
                    _pad: [0; 7],
                    ptr: boxed(Vec::with_capacity(capacity)),
                },
            },
        }
    }

    /// Take the value out, leaving `null` behind.
    ///
    /// This is the observable form of the move contract: the source stays
    /// valid and destructible and its state is distinguishable as empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::new_null())
    }

    /// The requested decimal precision of a double value, if one was set.
    #[inline]
    pub fn precision(&self) -> Option<u8> {
        if self.tag() == Self::DOUBLE {
            let p = unsafe { self.cell.dbl.precision };
            (p != 0).then_some(p)
        } else {
            None
        }
    }

    #[inline(always)]
    pub(crate) fn tag(&self) -> u8 {
        // The tag byte is the first field of every payload layout.
        unsafe { self.cell.tag.tag }
    }

    pub(crate) fn json_type(&self) -> JsonType {
        match self.tag() {
            Self::NULL => JsonType::Null,
            Self::BOOL => JsonType::Boolean,
            Self::SIGNED | Self::UNSIGNED | Self::DOUBLE => JsonType::Number,
            Self::SHORT_STR | Self::STRING => JsonType::String,
            Self::EMPTY_OBJECT | Self::OBJECT => JsonType::Object,
            Self::ARRAY => JsonType::Array,
            _ => unreachable!("corrupt discriminant"),
        }
    }

    #[inline(always)]
    pub(crate) fn i64(&self) -> i64 {
        debug_assert_eq!(self.tag(), Self::SIGNED);
        unsafe { self.cell.sint.val }
    }

    #[inline(always)]
    pub(crate) fn u64(&self) -> u64 {
        debug_assert_eq!(self.tag(), Self::UNSIGNED);
        unsafe { self.cell.uint.val }
    }

    #[inline(always)]
    pub(crate) fn f64(&self) -> f64 {
        debug_assert_eq!(self.tag(), Self::DOUBLE);
        unsafe { self.cell.dbl.val }
    }

    #[inline(always)]
    pub(crate) fn bool(&self) -> bool {
        debug_assert_eq!(self.tag(), Self::BOOL);
        unsafe { self.cell.boolean.val }
    }

    /// String content, for either string state.
    pub(crate) fn str_slice(&self) -> &str {
        match self.tag() {
            Self::SHORT_STR => unsafe {
                let inline = &self.cell.inline;
                std::str::from_utf8_unchecked(&inline.buf[..inline.len as usize])
            },
            Self::STRING => unsafe { self.cell.string.ptr.as_ref().as_str() },
            _ => unreachable!("not a string"),
        }
    }

    #[inline]
    fn arr(&self) -> &Vec<Value> {
        debug_assert_eq!(self.tag(), Self::ARRAY);
        unsafe { self.cell.array.ptr.as_ref() }
    }

    #[inline]
    pub(crate) fn arr_mut(&mut self) -> &mut Vec<Value> {
        debug_assert_eq!(self.tag(), Self::ARRAY);
        unsafe { self.cell.array.ptr.as_mut() }
    }

    #[inline]
    fn obj(&self) -> &Vec<Pair> {
        debug_assert_eq!(self.tag(), Self::OBJECT);
        unsafe { self.cell.object.ptr.as_ref() }
    }

    #[inline]
    fn obj_mut(&mut self) -> &mut Vec<Pair> {
        debug_assert_eq!(self.tag(), Self::OBJECT);
        unsafe { self.cell.object.ptr.as_mut() }
    }

    /// Array elements, or an empty slice for non-array states.
    #[inline]
    pub(crate) fn as_slice(&self) -> &[Value] {
        if self.tag() == Self::ARRAY {
            self.arr()
        } else {
            &[]
        }
    }

    #[inline]
    pub(crate) fn as_slice_mut(&mut self) -> &mut [Value] {
        if self.tag() == Self::ARRAY {
            self.arr_mut()
        } else {
            &mut []
        }
    }

    /// Object members, or an empty slice for the empty-object sentinel.
    #[inline]
    pub(crate) fn pairs(&self) -> &[Pair] {
        if self.tag() == Self::OBJECT {
            self.obj()
        } else {
            &[]
        }
    }

    #[inline]
    pub(crate) fn pairs_mut(&mut self) -> &mut [Pair] {
        if self.tag() == Self::OBJECT {
            self.obj_mut()
        } else {
            &mut []
        }
    }

    /// Transition the empty-object sentinel into a real heap object. This is
    /// the single point where the deferred `{}` allocation happens.
    pub(crate) fn materialize_object(&mut self, capacity: usize) -> &mut Vec<Pair> {
        if self.tag() == Self::EMPTY_OBJECT {
            *self = Self::new_object_with(capacity);
        }
        self.obj_mut()
    }

    pub(crate) fn len(&self) -> usize {
        match self.tag() {
            Self::ARRAY => self.arr().len(),
            Self::OBJECT => self.obj().len(),
            Self::SHORT_STR | Self::STRING => self.str_slice().len(),
            _ => 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        match self.tag() {
            Self::ARRAY => self.arr().capacity(),
            Self::OBJECT => self.obj().capacity(),
            _ => 0,
        }
    }

    pub(crate) fn clear(&mut self) {
        match self.tag() {
            Self::ARRAY => self.arr_mut().clear(),
            Self::OBJECT => self.obj_mut().clear(),
            _ => {}
        }
    }

    pub(crate) fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_slice().get(index)
    }

    pub(crate) fn get_index_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.as_slice_mut().get_mut(index)
    }

    pub(crate) fn get_key(&self, key: &str) -> Option<&Value> {
        let pairs = self.pairs();
        key_position(pairs, key).ok().map(|i| &pairs[i].1)
    }

    pub(crate) fn get_key_mut(&mut self, key: &str) -> Option<&mut Value> {
        let pairs = self.pairs_mut();
        match key_position(pairs, key) {
            Ok(i) => Some(&mut pairs[i].1),
            Err(_) => None,
        }
    }

    pub(crate) fn get_key_value(&self, key: &str) -> Option<(&str, &Value)> {
        let pairs = self.pairs();
        key_position(pairs, key)
            .ok()
            .map(|i| (pairs[i].0.str_slice(), &pairs[i].1))
    }

    /// Insert or assign a member, materializing the object if needed. Returns
    /// the previous value for the key.
    pub(crate) fn insert_pair(&mut self, key: &str, val: Value) -> Option<Value> {
        let pairs = self.materialize_object(DEFAULT_OBJ_CAP);
        match key_position(pairs, key) {
            Ok(i) => Some(std::mem::replace(&mut pairs[i].1, val)),
            Err(i) => {
                pairs.insert(i, (Value::copy_str(key), val));
                None
            }
        }
    }

    /// Insert with an already-built string key, used by the event builder.
    pub(crate) fn insert_key_value(&mut self, key: Value, val: Value) -> Option<Value> {
        debug_assert!(matches!(key.tag(), Self::SHORT_STR | Self::STRING));
        let pairs = self.materialize_object(DEFAULT_OBJ_CAP);
        match key_position(pairs, key.str_slice()) {
            Ok(i) => Some(std::mem::replace(&mut pairs[i].1, val)),
            Err(i) => {
                pairs.insert(i, (key, val));
                None
            }
        }
    }

    /// Remove a member by key, preserving the order of the remaining members.
    pub(crate) fn remove_key(&mut self, key: &str) -> Option<Value> {
        if self.tag() != Self::OBJECT {
            // The empty-object sentinel has nothing to remove.
            return None;
        }
        let pairs = self.obj_mut();
        match key_position(pairs, key) {
            Ok(i) => Some(pairs.remove(i).1),
            Err(_) => None,
        }
    }

    /// Checked member access: fails with a type-mismatch error on non-object
    /// values and with a key-not-found error on a miss. On the empty-object
    /// sentinel the lookup fails without allocating.
    pub fn at(&self, key: &str) -> Result<&Value> {
        match self.tag() {
            Self::EMPTY_OBJECT | Self::OBJECT => self
                .get_key(key)
                .ok_or_else(|| Error::key_not_found(key)),
            _ => Err(Error::type_mismatch("object", self.json_type())),
        }
    }

    /// Checked positional access: the i-th array element, or the i-th member
    /// value of an object. Fails with a type-mismatch error on scalar values
    /// and with an out-of-range error past the end.
    pub fn at_index(&self, index: usize) -> Result<&Value> {
        match self.tag() {
            Self::ARRAY => self
                .get_index(index)
                .ok_or_else(|| Error::out_of_range(index, self.len())),
            Self::EMPTY_OBJECT | Self::OBJECT => {
                let pairs = self.pairs();
                match pairs.get(index) {
                    Some(pair) => Ok(&pair.1),
                    None => Err(Error::out_of_range(index, pairs.len())),
                }
            }
            _ => Err(Error::type_mismatch("array or object", self.json_type())),
        }
    }

    /// Coerce to `i64`. Accepts the signed, unsigned and integral double
    /// states, and parses a string payload as a JSON number literal.
    pub fn to_i64(&self) -> Result<i64> {
        match self.tag() {
            Self::SIGNED => Ok(self.i64()),
            Self::UNSIGNED => {
                let u = self.u64();
                i64::try_from(u).map_err(|_| Error::invalid_number(&u.to_string()))
            }
            Self::DOUBLE => {
                let f = self.f64();
                // `i64::MAX as f64` rounds up to 2^63, the first value that
                // does not fit, so the upper bound is exclusive.
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Ok(f as i64)
                } else {
                    Err(Error::invalid_number(&f.to_string()))
                }
            }
            Self::SHORT_STR | Self::STRING => {
                let s = self.str_slice();
                s.parse().map_err(|_| Error::invalid_number(s))
            }
            _ => Err(Error::type_mismatch("number", self.json_type())),
        }
    }

    /// Coerce to `u64`, with the same cross-type rules as [`Value::to_i64`].
    pub fn to_u64(&self) -> Result<u64> {
        match self.tag() {
            Self::UNSIGNED => Ok(self.u64()),
            Self::SIGNED => {
                let i = self.i64();
                u64::try_from(i).map_err(|_| Error::invalid_number(&i.to_string()))
            }
            Self::DOUBLE => {
                let f = self.f64();
                // `u64::MAX as f64` rounds up to 2^64; exclusive bound, as in
                // `to_i64`.
                if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
                    Ok(f as u64)
                } else {
                    Err(Error::invalid_number(&f.to_string()))
                }
            }
            Self::SHORT_STR | Self::STRING => {
                let s = self.str_slice();
                s.parse().map_err(|_| Error::invalid_number(s))
            }
            _ => Err(Error::type_mismatch("number", self.json_type())),
        }
    }

    /// Coerce to `f64`. Integers convert by value (values beyond 2^53 round);
    /// string payloads are parsed as JSON number literals.
    pub fn to_f64(&self) -> Result<f64> {
        match self.tag() {
            Self::DOUBLE => Ok(self.f64()),
            Self::SIGNED => Ok(self.i64() as f64),
            Self::UNSIGNED => Ok(self.u64() as f64),
            Self::SHORT_STR | Self::STRING => {
                let s = self.str_slice();
                match s.parse::<f64>() {
                    Ok(f) if f.is_finite() => Ok(f),
                    _ => Err(Error::invalid_number(s)),
                }
            }
            _ => Err(Error::type_mismatch("number", self.json_type())),
        }
    }

    /// Returns the object view if the value is in either object state.
    #[inline]
    pub fn as_object(&self) -> Option<&Object> {
        match self.tag() {
            Self::EMPTY_OBJECT | Self::OBJECT => Some(Object::ref_cast(self)),
            _ => None,
        }
    }

    /// Returns the mutable object view if the value is in either object state.
    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self.tag() {
            Self::EMPTY_OBJECT | Self::OBJECT => Some(Object::ref_cast_mut(self)),
            _ => None,
        }
    }

    /// Returns the array view if the value is an array.
    #[inline]
    pub fn as_array(&self) -> Option<&Array> {
        if self.tag() == Self::ARRAY {
            Some(Array::ref_cast(self))
        } else {
            None
        }
    }

    /// Returns the mutable array view if the value is an array.
    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        if self.tag() == Self::ARRAY {
            Some(Array::ref_cast_mut(self))
        } else {
            None
        }
    }

    /// Consumes the value, returning the object if it is in either object
    /// state.
    #[inline]
    pub fn into_object(self) -> Option<Object> {
        match self.tag() {
            Self::EMPTY_OBJECT | Self::OBJECT => Some(Object(self)),
            _ => None,
        }
    }

    /// Consumes the value, returning the array if it is an array.
    #[inline]
    pub fn into_array(self) -> Option<Array> {
        if self.tag() == Self::ARRAY {
            Some(Array(self))
        } else {
            None
        }
    }

    /// Detach an owned array/object payload, leaving `null`. Used by the
    /// iterative destructor.
    fn detach_heap(&mut self) -> Option<Heap> {
        let heap = match self.tag() {
            Self::ARRAY => Heap::Array(unsafe { *Box::from_raw(self.cell.array.ptr.as_ptr()) }),
            Self::OBJECT => Heap::Object(unsafe { *Box::from_raw(self.cell.object.ptr.as_ptr()) }),
            _ => return None,
        };
        self.cell = Cell {
            tag: TagPayload {
                tag: Self::NULL,
                _pad: [0; 15],
            },
        };
        Some(heap)
    }
}

enum Heap {
    Array(Vec<Value>),
    Object(Vec<Pair>),
}

#[inline]
fn boxed<T>(val: T) -> NonNull<T> {
    // Box::into_raw never returns null.
    unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(val))) }
}

/// Locate `key` among the members: `Ok(position)` when present, `Err(slot)`
/// where a new member belongs otherwise. With the `sort_keys` feature the
/// members are kept sorted and this is a binary search; by default the order
/// is insertion order and new members go to the end.
#[cfg(feature = "sort_keys")]
pub(crate) fn key_position(pairs: &[Pair], key: &str) -> std::result::Result<usize, usize> {
    pairs.binary_search_by(|pair| pair.0.str_slice().cmp(key))
}

#[cfg(not(feature = "sort_keys"))]
pub(crate) fn key_position(pairs: &[Pair], key: &str) -> std::result::Result<usize, usize> {
    pairs
        .iter()
        .position(|pair| pair.0.str_slice() == key)
        .ok_or(pairs.len())
}

impl Default for Value {
    /// The default value is the empty-object sentinel, not `null`.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Value {
    /// Deep copy. Heap states allocate a fresh cell and copy its contents
    /// recursively; trivial states are a bitwise copy of the cell.
    fn clone(&self) -> Self {
        match self.tag() {
            Self::STRING => Self {
                cell: Cell {
                    string: StrPayload {
                        tag: Self::STRING,
                        _pad: [0; 7],
                        ptr: boxed(unsafe { self.cell.string.ptr.as_ref() }.clone()),
                    },
                },
            },
            Self::ARRAY => Self {
                cell: Cell {
                    array: ArrPayload {
                        tag: Self::ARRAY,
                        _pad: [0; 7],
                        ptr: boxed(self.arr().clone()),
                    },
                },
            },
            Self::OBJECT => Self {
                cell: Cell {
                    object: ObjPayload {
                        tag: Self::OBJECT,
                        _pad: [0; 7],
                        ptr: boxed(self.obj().clone()),
                    },
                },
            },
            _ => Self { cell: self.cell },
        }
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        match self.tag() {
            Self::STRING => unsafe {
                drop(Box::from_raw(self.cell.string.ptr.as_ptr()));
            },
            Self::ARRAY | Self::OBJECT => {
                // Iterative teardown with an explicit work-list, so that a
                // pathologically deep tree cannot overflow the stack.
                let mut work = Vec::new();
                if let Some(heap) = self.detach_heap() {
                    work.push(heap);
                }
                while let Some(heap) = work.pop() {
                    match heap {
                        Heap::Array(mut nodes) => {
                            for node in &mut nodes {
                                if let Some(heap) = node.detach_heap() {
                                    work.push(heap);
                                }
                            }
                        }
                        Heap::Object(mut pairs) => {
                            for (_, node) in &mut pairs {
                                if let Some(heap) = node.detach_heap() {
                                    work.push(heap);
                                }
                            }
                        }
                    }
                    // The detached vector drops here; its children are all
                    // leaves by now.
                }
            }
            _ => {}
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::to_string(self))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{array, json, object, JsonValueTrait};

    #[test]
    fn test_cell_layout() {
        assert_eq!(std::mem::size_of::<Value>(), CELL_SIZE);
        assert_eq!(std::mem::align_of::<Value>(), 8);
        assert_eq!(MAX_INLINE_LEN, 13);
    }

    #[test]
    fn test_scalar_roundtrip() {
        assert!(Value::new_null().is_null());
        assert_eq!(Value::new_bool(true).as_bool(), Some(true));
        assert_eq!(Value::new_i64(-7).as_i64(), Some(-7));
        assert_eq!(Value::new_u64(7).as_u64(), Some(7));
        assert_eq!(Value::new_f64(1.25).unwrap().as_f64(), Some(1.25));
        assert_eq!(Value::copy_str("hi").as_str(), Some("hi"));
        assert!(Value::new_f64(f64::NAN).is_none());
        assert!(Value::new_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn test_default_is_empty_object() {
        let v = Value::default();
        assert!(v.is_object());
        assert_eq!(v.tag(), Value::EMPTY_OBJECT);
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
    }

    #[test]
    fn test_inline_boundary() {
        let at = "x".repeat(MAX_INLINE_LEN);
        let over = "x".repeat(MAX_INLINE_LEN + 1);

        let inline = Value::copy_str(&at);
        let heap = Value::copy_str(&over);
        assert_eq!(inline.tag(), Value::SHORT_STR);
        assert_eq!(heap.tag(), Value::STRING);

        // Indistinguishable through the accessor.
        assert_eq!(inline.as_str(), Some(at.as_str()));
        assert_eq!(heap.as_str(), Some(over.as_str()));

        assert_eq!(Value::copy_str("").tag(), Value::SHORT_STR);
    }

    #[test]
    fn test_take_leaves_null() {
        let mut v = Value::copy_str("a long heap-allocated string here");
        assert_eq!(v.tag(), Value::STRING);
        let taken = v.take();
        assert!(v.is_null());
        assert_eq!(taken.as_str(), Some("a long heap-allocated string here"));
        // Dropping both must not double-free; covered by running under miri or
        // a sanitizer in CI.
        drop(v);
        drop(taken);
    }

    fn state_samples() -> Vec<Value> {
        vec![
            Value::new_null(),
            Value::new(),
            Value::new_bool(true),
            Value::new_i64(-42),
            Value::new_u64(42),
            Value::new_f64(2.5).unwrap(),
            Value::copy_str("short"),
            Value::copy_str("a string long enough to live on the heap"),
            json!([1, "two", [3]]),
            json!({"a": 1, "b": {"c": null}}),
        ]
    }

    #[test]
    fn test_swap_all_state_pairs() {
        // All 100 ordered discriminant pairs: swap must exchange contents and
        // be its own inverse.
        let samples = state_samples();
        for left in &samples {
            for right in &samples {
                let mut a = left.clone();
                let mut b = right.clone();
                std::mem::swap(&mut a, &mut b);
                assert_eq!(&a, right);
                assert_eq!(&b, left);
                std::mem::swap(&mut a, &mut b);
                assert_eq!(&a, left);
                assert_eq!(&b, right);
            }
        }
    }

    #[test]
    fn test_swap_short_and_heap_string() {
        let mut a = Value::copy_str("hello");
        let long = "0123456789012345678901234567890123456789";
        let mut b = Value::copy_str(long);
        std::mem::swap(&mut a, &mut b);
        assert_eq!(a.as_str(), Some(long));
        assert_eq!(b.as_str(), Some("hello"));
    }

    #[test]
    fn test_clone_independence() {
        let original = json!({"arr": [1, 2, 3], "s": "a fairly long string payload"});
        let mut copy = original.clone();
        copy["arr"].as_array_mut().unwrap().push(Value::new_i64(4));
        copy.as_object_mut().unwrap().insert("extra", Value::new_null());

        assert_eq!(original["arr"].as_array().unwrap().len(), 3);
        assert_eq!(copy["arr"].as_array().unwrap().len(), 4);
        assert!(original.as_object().unwrap().get("extra").is_none());
    }

    #[test]
    fn test_empty_object_materializes_on_insert() {
        let mut v = Value::new();
        assert_eq!(v.tag(), Value::EMPTY_OBJECT);
        v["a"] = Value::new_i64(1);
        assert_eq!(v.tag(), Value::OBJECT);
        assert_eq!(v.as_object().unwrap().len(), 1);
        assert_eq!(v["a"].as_i64(), Some(1));
    }

    #[test]
    fn test_at_errors() {
        let v = json!({"a": 1});
        assert!(v.at("a").is_ok());
        assert!(matches!(v.at("b"), Err(crate::Error::KeyNotFound { .. })));
        assert!(matches!(
            Value::new_i64(1).at("a"),
            Err(crate::Error::TypeMismatch { .. })
        ));

        let arr = json!([1, 2]);
        assert_eq!(arr.at_index(1).unwrap().as_i64(), Some(2));
        assert!(matches!(
            arr.at_index(2),
            Err(crate::Error::OutOfRange { index: 2, len: 2 })
        ));

        // Key lookup on the sentinel fails without allocating.
        let empty = Value::new();
        assert!(empty.at("a").is_err());
        assert_eq!(empty.tag(), Value::EMPTY_OBJECT);

        // Positional access works on object members too.
        assert_eq!(v.at_index(0).unwrap().as_i64(), Some(1));
    }

    #[test]
    fn test_numeric_coercions() {
        assert_eq!(Value::new_u64(5).to_i64().unwrap(), 5);
        assert_eq!(Value::new_i64(5).to_u64().unwrap(), 5);
        assert!(Value::new_i64(-1).to_u64().is_err());
        assert!(Value::new_u64(u64::MAX).to_i64().is_err());
        assert_eq!(Value::new_f64(3.0).unwrap().to_i64().unwrap(), 3);
        assert!(Value::new_f64(3.5).unwrap().to_i64().is_err());

        // 2^63 and 2^64 are exactly the first doubles past the integer
        // ranges; they must error, not saturate.
        let two_pow_63 = Value::new_f64(9_223_372_036_854_775_808.0).unwrap();
        assert!(matches!(
            two_pow_63.to_i64(),
            Err(crate::Error::InvalidNumber { .. })
        ));
        assert_eq!(two_pow_63.to_u64().unwrap(), 1u64 << 63);
        let two_pow_64 = Value::new_f64(18_446_744_073_709_551_616.0).unwrap();
        assert!(matches!(
            two_pow_64.to_u64(),
            Err(crate::Error::InvalidNumber { .. })
        ));
        // The largest double below 2^63 still converts.
        let below = Value::new_f64(9_223_372_036_854_774_784.0).unwrap();
        assert_eq!(below.to_i64().unwrap(), 9_223_372_036_854_774_784);
        assert_eq!(
            Value::new_f64(-9_223_372_036_854_775_808.0)
                .unwrap()
                .to_i64()
                .unwrap(),
            i64::MIN
        );

        // String payloads parse as JSON number literals.
        assert_eq!(Value::copy_str("42").to_i64().unwrap(), 42);
        assert_eq!(Value::copy_str("-1.5e2").to_f64().unwrap(), -150.0);
        assert!(matches!(
            Value::copy_str("nope").to_f64(),
            Err(crate::Error::InvalidNumber { .. })
        ));
        assert!(matches!(
            Value::new_bool(true).to_i64(),
            Err(crate::Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_deep_tree_drop() {
        // 200k levels: a recursive destructor would overflow the stack.
        let mut v = Value::new_i64(1);
        for _ in 0..200_000 {
            let mut arr = Value::new_array_with(1);
            arr.arr_mut().push(v);
            v = arr;
        }
        drop(v);
    }

    #[test]
    fn test_precision_hint() {
        let v = Value::new_f64_with_precision(1.0 / 3.0, 3).unwrap();
        assert_eq!(v.precision(), Some(3));
        assert_eq!(crate::to_string(&v), "0.333");
        assert_eq!(Value::new_f64(0.5).unwrap().precision(), None);
        // The hint survives a deep copy.
        assert_eq!(v.clone().precision(), Some(3));
    }

    #[test]
    fn test_literal_macros() {
        let v = json!({"nested": {"arr": [1, null, true]}});
        assert_eq!(v["nested"]["arr"][2].as_bool(), Some(true));
        assert_eq!(array![1, 2, 3].len(), 3);
        assert_eq!(object! {"k": "v"}.get("k").unwrap().as_str(), Some("v"));
    }
}
