use alloc::string::String;
use core::fmt::{self, Display, Formatter};

/// # The error type for codec operations
///
/// Every variant maps to a stable numeric code (see [CodecError::code]) so that
/// collaborators outside Rust can report failures the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// A required buffer is absent (empty)
    NullPointer,

    /// Width or height is not strictly positive, or the image is too large to address
    InvalidDimensions { width: i32, height: i32 },

    /// A buffer request could not be satisfied
    AllocationFailed { bytes: usize, context: &'static str },

    /// Unknown transform method index
    InvalidMethod(i32),

    /// Unknown transform method name
    UnknownMethodName(String),

    /// A buffer is shorter than the image geometry requires
    BadImageData { length: usize, required: usize },

    /// A quantized coefficient does not fit into the 16 bit transport format
    CoefficientOutOfRange { index: usize, value: i32 },

    /// A transport payload or its block count does not match the image geometry
    TransportLength { length: usize, required: usize },
}

/// Result alias used throughout the crate
pub type CodecResult<T> = Result<T, CodecError>;

impl CodecError {
    pub const SUCCESS: i32 = 0;

    /// Numeric code of this error, compatible with the C interface codes.
    pub fn code(&self) -> i32 {
        use CodecError::*;

        match self {
            NullPointer => -1,
            InvalidDimensions { .. } => -2,
            AllocationFailed { .. } => -3,
            InvalidMethod(_) | UnknownMethodName(_) => -4,
            BadImageData { .. } => -5,
            CoefficientOutOfRange { .. } => -6,
            TransportLength { .. } => -7,
        }
    }
}

/// Returns the human readable text for a numeric error code.
///
/// Unknown codes map to `"Unknown error"`.
pub fn error_to_string(code: i32) -> &'static str {
    match code {
        0 => "Success",
        -1 => "Null pointer",
        -2 => "Invalid dimensions",
        -3 => "Allocation failed",
        -4 => "Invalid DCT method",
        -5 => "Bad image data",
        -6 => "Coefficient out of range",
        -7 => "Transport length mismatch",
        _ => "Unknown error",
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use CodecError::*;

        match self {
            NullPointer => f.write_str("Null pointer"),
            InvalidDimensions { width, height } => {
                write!(f, "Invalid dimensions {}x{}", width, height)
            }
            AllocationFailed { bytes, context } => {
                write!(f, "Allocation of {} bytes failed while {}", bytes, context)
            }
            InvalidMethod(method) => write!(f, "Invalid DCT method: {}", method),
            UnknownMethodName(name) => write!(f, "Invalid DCT method: {:?}", name),
            BadImageData { length, required } => write!(
                f,
                "Bad image data length: {} (required {})",
                length, required
            ),
            CoefficientOutOfRange { index, value } => write!(
                f,
                "Coefficient {} at index {} does not fit in 16 bits",
                value, index
            ),
            TransportLength { length, required } => write!(
                f,
                "Transport payload has {} bytes, expected {}",
                length, required
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {}
