use std::fmt;

/// The error returned when a wire value cannot be read from a buffer,
/// either because the buffer is exhausted or because the bytes do not form
/// a valid value of the requested type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SerdeErr;

impl fmt::Display for SerdeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to read a wire value from the buffer")
    }
}

impl std::error::Error for SerdeErr {}
