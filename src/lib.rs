//! A dynamically-typed JSON value with a fixed-size storage cell.
//!
//! Every [`Value`] is one 16-byte tagged cell. Scalars live in the cell
//! directly, strings of up to [`MAX_INLINE_LEN`] bytes are inlined, and
//! longer strings, arrays and objects own exactly one heap allocation each.
//! Cloning deep-copies, [`Value::take`] moves the payload out and leaves
//! `null` behind, and `std::mem::swap` exchanges any two values in constant
//! time regardless of their states.
//!
//! Default construction yields an empty object whose storage is allocated
//! lazily, so a tree can be built up by plain assignment:
//!
//! ```
//! use dynjson::{json, Value};
//!
//! let mut v = Value::new();
//! v["config"]["retries"] = json!(3);
//! v["config"]["tags"] = json!(["a", "b"]);
//!
//! assert_eq!(v, json!({"config": {"retries": 3, "tags": ["a", "b"]}}));
//! assert_eq!(dynjson::to_string(&v), r#"{"config":{"retries":3,"tags":["a","b"]}}"#);
//! ```
//!
//! Values interoperate with serde in both directions: [`to_value`] builds a
//! tree from any `Serialize` type, and `Value` itself implements `Serialize`
//! and `Deserialize`. A streaming producer (a parser front end) feeds the
//! [`ValueBuilder`] event sink instead.
//!
//! Object members keep insertion order by default; the `sort_keys` feature
//! switches every object to key order and member lookup to binary search.

mod error;
pub mod value;

pub use crate::error::{Error, Result};
pub use crate::value::*;
