use std::backtrace::Backtrace;
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The instance must contain at least one square.
    #[error("instance size must be at least 1, got {0}")]
    InvalidSize(usize),
    /// The coordinate and size lists handed to a constraint disagree in length.
    #[error("mismatched constraint arguments: {xs} x-coordinates, {ys} y-coordinates, {sizes} sizes")]
    MismatchedLengths {
        xs: usize,
        ys: usize,
        sizes: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<ModelError>,
        backtrace: Box<Backtrace>,
    },
}

impl From<ModelError> for Error {
    fn from(inner: ModelError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}

impl Error {
    /// Returns the underlying model error, discarding the captured backtrace.
    pub fn inner(&self) -> &ModelError {
        match self {
            Error::Inner { inner, .. } => inner,
        }
    }
}
