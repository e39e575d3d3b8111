//! Call context

use weekframe_range::{ColumnScheme, ValidTimeframes};

/// Defaults applied when a call leaves an optional argument out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallContext {
    pub scheme: ColumnScheme,
    pub valid_timeframes: ValidTimeframes,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(mut self, scheme: ColumnScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_valid_timeframes(mut self, valid: ValidTimeframes) -> Self {
        self.valid_timeframes = valid;
        self
    }
}
