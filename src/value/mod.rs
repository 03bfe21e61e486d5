//! A dynamic type representing any valid JSON value.

pub mod array;
pub(crate) mod de;
mod from;
mod index;
pub(crate) mod node;
mod tryfrom;
#[macro_use]
mod macros;
pub mod object;
mod partial_eq;
mod ser;
mod value_trait;
pub mod visitor;

#[doc(inline)]
pub use self::array::Array;
pub use self::index::Index;
#[doc(inline)]
pub use self::node::{Value, MAX_INLINE_LEN};
#[doc(inline)]
pub use self::object::{Entry, Object, OccupiedEntry, Pair, VacantEntry};
#[doc(inline)]
pub use self::ser::{to_string, to_value};
#[doc(inline)]
pub use self::value_trait::{JsonType, JsonValueTrait};
#[doc(inline)]
pub use self::visitor::{Event, ValueBuilder, ValueVisitor};
