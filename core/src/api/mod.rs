//! Public API for building and running RPN programs.
//!
//! A [`Program`] is compiled once from text and then either evaluated to a
//! number with [`Program::evaluate`] or specialised with
//! [`Program::partial`], which folds whatever the supplied bindings make
//! foldable and returns the residual program.
//!
//! # Example
//!
//! ```
//! use tsrpn_core::api::{Error, Program};
//! use tsrpn_core::bindings::Bindings;
//!
//! let program = Program::new("a,b,c,d,+,+,+").unwrap();
//! let partial = program.partial(&Bindings::new().bind("b", 2)).unwrap();
//! assert_eq!(partial.to_string(), "a,2,c,d,+,+,+");
//!
//! let err = partial.evaluate(&Bindings::new()).unwrap_err();
//! assert_eq!(err, Error::OpenBindings(vec!["a".into(), "c".into(), "d".into()]));
//! ```

pub mod error;
pub mod options;
pub mod program;


pub use error::{Error, Result, SyntaxError};
pub use options::{DEFAULT_DELIMITER, DEFAULT_SECONDS_PER_INTERVAL, ProgramOptions};
pub use program::Program;
