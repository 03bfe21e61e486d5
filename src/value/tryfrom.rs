use super::node::Value;
use crate::error::Error;

impl TryFrom<f64> for Value {
    type Error = Error;

    /// Fails on NaN and infinity, which have no JSON representation.
    fn try_from(val: f64) -> Result<Self, Self::Error> {
        Value::new_f64(val).ok_or_else(|| Error::invalid_number(&val.to_string()))
    }
}

impl TryFrom<f32> for Value {
    type Error = Error;

    /// Fails on NaN and infinity, which have no JSON representation.
    fn try_from(val: f32) -> Result<Self, Self::Error> {
        Value::new_f64(val as f64).ok_or_else(|| Error::invalid_number(&val.to_string()))
    }
}

#[cfg(test)]
mod test {
    use crate::{Error, Value};

    #[test]
    fn test_try_from_floats() {
        assert_eq!(Value::try_from(2.5f64).unwrap(), 2.5);
        assert_eq!(Value::try_from(2.5f32).unwrap(), 2.5);
        assert!(matches!(
            Value::try_from(f64::NAN),
            Err(Error::InvalidNumber { .. })
        ));
        assert!(matches!(
            Value::try_from(f32::NEG_INFINITY),
            Err(Error::InvalidNumber { .. })
        ));
    }
}
