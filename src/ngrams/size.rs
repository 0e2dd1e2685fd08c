//! The `n` of n-grams.

use std::fmt;
use std::num::NonZeroUsize;

use tracing::warn;

use super::error::NgramError;

/// Number of words grouped into one n-gram token. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NgramSize(NonZeroUsize);

/// A size obtained by coercing a possibly fractional request.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedSize {
    /// The usable size.
    pub size: NgramSize,
    /// Set when the request had to be rounded.
    pub warning: Option<String>,
}

impl NgramSize {
    /// Single words.
    pub const UNIGRAM: Self = Self(NonZeroUsize::MIN);

    /// Creates a size from an integer.
    ///
    /// # Errors
    ///
    /// Returns [`NgramError::InvalidSize`] for zero.
    pub fn new(n: usize) -> Result<Self, NgramError> {
        #[allow(clippy::cast_precision_loss)]
        let value = n as f64;
        NonZeroUsize::new(n)
            .map(Self)
            .ok_or(NgramError::InvalidSize { value })
    }

    /// Accepts any number, rounding non-integers to the nearest integer.
    ///
    /// Rounding is not an error: it is logged as a warning and reported in
    /// [`CoercedSize::warning`].
    ///
    /// # Errors
    ///
    /// Returns [`NgramError::InvalidSize`] if the value is not finite or
    /// rounds below 1.
    pub fn coerce(value: f64) -> Result<CoercedSize, NgramError> {
        if !value.is_finite() {
            return Err(NgramError::InvalidSize { value });
        }

        let rounded = value.round();
        if rounded < 1.0 {
            return Err(NgramError::InvalidSize { value });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let size = Self::new(rounded as usize)?;

        #[allow(clippy::float_cmp)]
        let warning = if rounded == value {
            None
        } else {
            let message =
                format!("n-gram size {value} is not an integer, using nearest integer {size}");
            warn!(requested = value, using = size.get(), "{message}");
            Some(message)
        };

        Ok(CoercedSize { size, warning })
    }

    /// The size as a plain integer.
    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Returns `true` for single words.
    #[must_use]
    pub fn is_unigram(self) -> bool {
        self.get() == 1
    }
}

impl Default for NgramSize {
    fn default() -> Self {
        Self::UNIGRAM
    }
}

impl fmt::Display for NgramSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
