//! Configuration options for building a program.

use crate::api::SyntaxError;
use crate::catalog::Operator;

/// Delimiter between tokens, as in `12,age,*`.
pub const DEFAULT_DELIMITER: char = ',';

/// Seconds between successive samples of a time series.
pub const DEFAULT_SECONDS_PER_INTERVAL: f64 = 300.0;

/// Options applied when a [`Program`](crate::api::Program) is built.
///
/// # Example
///
/// ```
/// use tsrpn_core::api::{Program, ProgramOptions};
///
/// let options = ProgramOptions::default()
///     .with_delimiter('|')
///     .with_seconds_per_interval(60.0);
/// let program = Program::with_options("42|13|2|MEDIAN", options).unwrap();
/// assert_eq!(program.to_string(), "27.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgramOptions {
    /// Token separator. Must not itself name an operator.
    ///
    /// Default: `,`
    pub delimiter: char,

    /// Sampling interval used by `STEPWIDTH`, `TREND` and the `NEWxxx` names.
    ///
    /// Default: 300
    pub seconds_per_interval: f64,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            seconds_per_interval: DEFAULT_SECONDS_PER_INTERVAL,
        }
    }
}

impl ProgramOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_seconds_per_interval(mut self, seconds: f64) -> Self {
        self.seconds_per_interval = seconds;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), SyntaxError> {
        let mut buf = [0u8; 4];
        if Operator::from_name(self.delimiter.encode_utf8(&mut buf)).is_some() {
            return Err(SyntaxError::BadDelimiter(self.delimiter));
        }
        let seconds = self.seconds_per_interval;
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(SyntaxError::BadInterval(seconds));
        }
        Ok(())
    }
}
