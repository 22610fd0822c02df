use thiserror::Error as ThisError;

/// Errors produced while writing a [`Value`](crate::Value) to a sink.
///
/// There is no error path for *reading* a value: accessors never trap, they
/// coerce (see the `as_*` methods on [`Value`](crate::Value)) or return a
/// documented default.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("I/O error while writing to sink: {0}")]
    Io(#[from] std::io::Error),

    /// A user-installed serializer ([`crate::Value::set_serializer`]) reported
    /// a byte count that didn't match what it actually wrote. Surfaced rather
    /// than silently trusted, since a caller relying on the reported count
    /// (to size a buffer, report progress, etc.) would otherwise be fed a lie.
    #[error("serializer for a custom value returned an inconsistent byte count")]
    InconsistentWrite,
}

pub type Result<T> = core::result::Result<T, Error>;
