//! Types and traits for recording training metrics.
//!
//! * [`Record`] - key-value pairs of scalar values
//! * [`RecordValue`] - the values that can be stored in a [`Record`]
//! * [`Recorder`] - writes records to some destination
//! * [`BufferedRecorder`] - keeps records in memory
//! * [`CsvRecorder`] - writes selected scalar values of records as CSV rows
//! * [`NullRecorder`] - discards all records
//!
//! ```rust
//! use deepq_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(3.0));
//! record.insert("reward", RecordValue::Scalar(-21.0));
//! assert_eq!(record.get_scalar("reward").unwrap(), -21.0);
//! ```
mod base;
mod buffered_recorder;
mod csv_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use csv_recorder::CsvRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
