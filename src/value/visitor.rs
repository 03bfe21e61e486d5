//! The parser-facing boundary: an event sink trait and a builder that
//! assembles a [`Value`] tree bottom-up from a stream of events.

use super::node::Value;
use crate::error::{Error, Result};

/// A sink for the event stream a streaming JSON producer emits.
///
/// A producer calls one `visit_*` method per token, in document order. Scalar
/// events inside an object must each be preceded by a
/// [`visit_key`](ValueVisitor::visit_key) call; container events nest. The
/// `hint` on the container-start events is an expected member count used to
/// presize storage, 0 when unknown.
pub trait ValueVisitor {
    fn visit_null(&mut self) -> Result<()>;

    fn visit_bool(&mut self, val: bool) -> Result<()>;

    fn visit_i64(&mut self, val: i64) -> Result<()>;

    fn visit_u64(&mut self, val: u64) -> Result<()>;

    fn visit_f64(&mut self, val: f64) -> Result<()>;

    fn visit_str(&mut self, val: &str) -> Result<()>;

    fn visit_key(&mut self, key: &str) -> Result<()>;

    fn visit_array_start(&mut self, hint: usize) -> Result<()>;

    fn visit_array_end(&mut self) -> Result<()>;

    fn visit_object_start(&mut self, hint: usize) -> Result<()>;

    fn visit_object_end(&mut self) -> Result<()>;
}

/// One event of a streaming producer, for drivers that dispatch from data
/// rather than calling the [`ValueVisitor`] methods directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(&'a str),
    Key(&'a str),
    ArrayStart,
    ArrayEnd,
    ObjectStart,
    ObjectEnd,
}

enum Frame {
    Array(Vec<Value>),
    Object { value: Value, key: Option<Value> },
}

/// Builds a [`Value`] tree from a [`ValueVisitor`] event stream.
///
/// Completed containers attach to their parent when their end event arrives,
/// so the tree grows bottom-up and a malformed stream is rejected at the
/// first event that cannot extend it, with
/// [`Error::UnexpectedEvent`][crate::Error::UnexpectedEvent].
///
/// # Examples
///
/// ```
/// use dynjson::{json, Event, ValueBuilder};
///
/// let mut builder = ValueBuilder::new();
/// for event in [
///     Event::ObjectStart,
///     Event::Key("a"),
///     Event::ArrayStart,
///     Event::I64(1),
///     Event::Bool(true),
///     Event::ArrayEnd,
///     Event::ObjectEnd,
/// ] {
///     builder.event(event).unwrap();
/// }
/// assert_eq!(builder.finish().unwrap(), json!({"a": [1, true]}));
/// ```
#[derive(Default)]
pub struct ValueBuilder {
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl ValueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event, dispatching to the [`ValueVisitor`] methods.
    pub fn event(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Null => self.visit_null(),
            Event::Bool(val) => self.visit_bool(val),
            Event::I64(val) => self.visit_i64(val),
            Event::U64(val) => self.visit_u64(val),
            Event::F64(val) => self.visit_f64(val),
            Event::Str(val) => self.visit_str(val),
            Event::Key(key) => self.visit_key(key),
            Event::ArrayStart => self.visit_array_start(0),
            Event::ArrayEnd => self.visit_array_end(),
            Event::ObjectStart => self.visit_object_start(0),
            Event::ObjectEnd => self.visit_object_end(),
        }
    }

    /// Finish the stream, returning the completed root value.
    ///
    /// Fails if a container is still open or no value was produced.
    pub fn finish(self) -> Result<Value> {
        if !self.stack.is_empty() {
            return Err(Error::UnexpectedEvent {
                event: "end of stream inside an open container",
            });
        }
        self.root.ok_or(Error::UnexpectedEvent {
            event: "end of stream before any value",
        })
    }

    /// Attach a completed value to the innermost open container, or make it
    /// the root.
    fn put(&mut self, val: Value) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Array(elems)) => {
                elems.push(val);
                Ok(())
            }
            Some(Frame::Object { value, key }) => match key.take() {
                Some(key) => {
                    value.insert_key_value(key, val);
                    Ok(())
                }
                None => Err(Error::UnexpectedEvent {
                    event: "value without a preceding key",
                }),
            },
            None => {
                if self.root.is_some() {
                    return Err(Error::UnexpectedEvent {
                        event: "second top-level value",
                    });
                }
                self.root = Some(val);
                Ok(())
            }
        }
    }
}

impl ValueVisitor for ValueBuilder {
    fn visit_null(&mut self) -> Result<()> {
        self.put(Value::new_null())
    }

    fn visit_bool(&mut self, val: bool) -> Result<()> {
        self.put(Value::new_bool(val))
    }

    fn visit_i64(&mut self, val: i64) -> Result<()> {
        self.put(Value::new_i64(val))
    }

    fn visit_u64(&mut self, val: u64) -> Result<()> {
        self.put(Value::new_u64(val))
    }

    fn visit_f64(&mut self, val: f64) -> Result<()> {
        match Value::new_f64(val) {
            Some(v) => self.put(v),
            None => Err(Error::invalid_number(&val.to_string())),
        }
    }

    fn visit_str(&mut self, val: &str) -> Result<()> {
        self.put(Value::copy_str(val))
    }

    fn visit_key(&mut self, key: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Object { key: slot, .. }) if slot.is_none() => {
                *slot = Some(Value::copy_str(key));
                Ok(())
            }
            Some(Frame::Object { .. }) => Err(Error::UnexpectedEvent {
                event: "key after an unconsumed key",
            }),
            _ => Err(Error::UnexpectedEvent {
                event: "key outside an object",
            }),
        }
    }

    fn visit_array_start(&mut self, hint: usize) -> Result<()> {
        // A key must already be pending when nested in an object; checked when
        // the completed array is attached.
        self.stack.push(Frame::Array(Vec::with_capacity(hint)));
        Ok(())
    }

    fn visit_array_end(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Array(elems)) => self.put(Value::from_vec(elems)),
            other => {
                if let Some(frame) = other {
                    self.stack.push(frame);
                }
                Err(Error::UnexpectedEvent {
                    event: "array end without a matching start",
                })
            }
        }
    }

    fn visit_object_start(&mut self, hint: usize) -> Result<()> {
        // A zero hint starts in the empty-object sentinel state, so `{}`
        // costs no allocation.
        let value = if hint > 0 {
            Value::new_object_with(hint)
        } else {
            Value::new()
        };
        self.stack.push(Frame::Object { value, key: None });
        Ok(())
    }

    fn visit_object_end(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Object { value, key: None }) => self.put(value),
            other => {
                if let Some(frame) = other {
                    self.stack.push(frame);
                }
                Err(Error::UnexpectedEvent {
                    event: "object end without a matching start",
                })
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{json, Error, JsonValueTrait};

    fn feed(events: &[Event<'_>]) -> Result<Value> {
        let mut builder = ValueBuilder::new();
        for event in events {
            builder.event(*event)?;
        }
        builder.finish()
    }

    #[test]
    fn test_build_scalar_root() {
        assert_eq!(feed(&[Event::I64(-3)]).unwrap(), -3);
        assert_eq!(feed(&[Event::Str("hi")]).unwrap(), "hi");
        assert!(feed(&[Event::Null]).unwrap().is_null());
    }

    #[test]
    fn test_build_nested_tree() {
        let got = feed(&[
            Event::ObjectStart,
            Event::Key("a"),
            Event::ArrayStart,
            Event::I64(1),
            Event::Null,
            Event::ObjectStart,
            Event::Key("b"),
            Event::Bool(true),
            Event::ObjectEnd,
            Event::ArrayEnd,
            Event::Key("c"),
            Event::F64(1.5),
            Event::ObjectEnd,
        ])
        .unwrap();
        assert_eq!(got, json!({"a": [1, null, {"b": true}], "c": 1.5}));
    }

    #[test]
    fn test_empty_object_stays_sentinel() {
        let got = feed(&[Event::ObjectStart, Event::ObjectEnd]).unwrap();
        assert_eq!(got.tag(), Value::EMPTY_OBJECT);
        assert_eq!(got, json!({}));
    }

    #[test]
    fn test_duplicate_key_keeps_last() {
        let got = feed(&[
            Event::ObjectStart,
            Event::Key("k"),
            Event::I64(1),
            Event::Key("k"),
            Event::I64(2),
            Event::ObjectEnd,
        ])
        .unwrap();
        assert_eq!(got, json!({"k": 2}));
    }

    #[test]
    fn test_malformed_streams() {
        let cases: &[&[Event<'_>]] = &[
            // value in an object without a key
            &[Event::ObjectStart, Event::I64(1)],
            // key outside an object
            &[Event::Key("k")],
            // two keys in a row
            &[Event::ObjectStart, Event::Key("a"), Event::Key("b")],
            // mismatched end
            &[Event::ArrayStart, Event::ObjectEnd],
            // object end with a dangling key
            &[Event::ObjectStart, Event::Key("a"), Event::ObjectEnd],
            // second root
            &[Event::I64(1), Event::I64(2)],
        ];
        for events in cases {
            let mut builder = ValueBuilder::new();
            let result = events.iter().try_for_each(|e| builder.event(*e));
            assert!(
                matches!(result, Err(Error::UnexpectedEvent { .. })),
                "stream {events:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_unfinished_streams() {
        let unfinished = [Event::ArrayStart, Event::I64(1)];
        let mut builder = ValueBuilder::new();
        for event in unfinished {
            builder.event(event).unwrap();
        }
        assert!(builder.finish().is_err());

        assert!(ValueBuilder::new().finish().is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut builder = ValueBuilder::new();
        assert!(matches!(
            builder.visit_f64(f64::NAN),
            Err(Error::InvalidNumber { .. })
        ));
    }
}
