use core::fmt;

/// Represents an error while setting up a MIDI receiver.
///
/// Decoding the byte stream itself never fails: malformed input is skipped silently.
/// Errors can only happen at initialization, when the transport or its buffer are unusable.
///
/// This type is a thin pointer to a static `ErrorKind`, so it is cheap to copy around.
///
/// If the `std` feature is enabled, this type implements `std::error::Error`.
/// Otherwise, only `Display` and `Debug` are implemented.
#[derive(Copy, Clone)]
pub struct Error {
    inner: &'static ErrorKind,
}
impl Error {
    /// Create a new error with the given `ErrorKind`.
    #[inline]
    pub fn new(kind: &'static ErrorKind) -> Error {
        Error::from(kind)
    }

    /// More information about the error itself.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        *self.inner
    }
}
impl From<&'static ErrorKind> for Error {
    #[inline]
    fn from(inner: &'static ErrorKind) -> Error {
        Error { inner }
    }
}
impl PartialEq for Error {
    fn eq(&self, rhs: &Error) -> bool {
        *self.inner == *rhs.inner
    }
}
impl Eq for Error {}
impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.inner, f)
    }
}
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self.inner, f)
    }
}
#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// The type of error that occurred while setting up the receiver.
///
/// Errors are broadly categorized into 2 classes, and specific error info is provided as a
/// non-normative string literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The receiver was configured with unusable parameters, such as a circular buffer with an odd
    /// capacity.
    Invalid(&'static str),

    /// The transport refused to start producing data.
    Transport(&'static str),
}
impl ErrorKind {
    /// Get the informative message on what exactly went wrong.
    #[inline]
    pub fn message(&self) -> &'static str {
        match *self {
            ErrorKind::Invalid(msg) => msg,
            ErrorKind::Transport(msg) => msg,
        }
    }
}
impl fmt::Display for ErrorKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Invalid(msg) => write!(f, "invalid midi receiver setup: {}", msg),
            ErrorKind::Transport(msg) => write!(f, "midi transport failure: {}", msg),
        }
    }
}

/// Build a `&'static ErrorKind::Invalid` out of a string literal.
#[macro_export]
macro_rules! err_invalid {
    ($msg:expr) => {{
        const ERR_KIND: &'static $crate::ErrorKind = &$crate::ErrorKind::Invalid($msg);
        ERR_KIND
    }};
}

/// Build a `&'static ErrorKind::Transport` out of a string literal.
///
/// Intended for `Transport` implementations that fail to arm.
#[macro_export]
macro_rules! err_transport {
    ($msg:expr) => {{
        const ERR_KIND: &'static $crate::ErrorKind = &$crate::ErrorKind::Transport($msg);
        ERR_KIND
    }};
}

/// The result type used by the MIDI receiver.
pub type Result<T> = StdResult<T, Error>;
pub(crate) use core::result::Result as StdResult;
