//! Records of key-value pairs for logging.
use crate::error::DeepqError;
use std::collections::HashMap;

/// Values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, e.g., loss or episode reward.
    Scalar(f32),
}

/// A container of key-value pairs.
///
/// ```rust
/// use deepq_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_slice(&[("loss", RecordValue::Scalar(0.5))]);
/// record.insert("lives", RecordValue::Scalar(3.0));
/// assert_eq!(record.get_scalar("loss").unwrap(), 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair, overwriting the value of an existing key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, DeepqError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            None => Err(DeepqError::RecordKeyError(k.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_scalar() {
        let mut record = Record::from_slice(&[("loss", RecordValue::Scalar(0.25))]);
        assert_eq!(record.get_scalar("loss"), Ok(0.25));
        assert_eq!(
            record.get_scalar("lives"),
            Err(DeepqError::RecordKeyError("lives".into()))
        );

        record.insert("loss", RecordValue::Scalar(0.5));
        assert_eq!(record.get_scalar("loss"), Ok(0.5));
    }
}
