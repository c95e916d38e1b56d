//! tsrpn - partial evaluation of RRDtool-style RPN expressions
//!
//! # Overview
//!
//! A program is a delimiter-separated postfix expression in the RRDtool CDEF
//! dialect, such as `qps,1000,*` or `a,b,c,3,MEDIAN`. Typical uses:
//!
//! - Precomputing the constant part of alerting or graphing formulas
//! - Binding some variables now and the rest later (partial application)
//! - Evaluating formulas over numbers and time series
//!
//! # Quick Start
//!
//! ```
//! use tsrpn::{Bindings, Program};
//!
//! // Building a program already folds what does not depend on a binding.
//! let program = Program::new("5,3,+,foo,*").unwrap();
//! assert_eq!(program.to_string(), "8,foo,*");
//!
//! // Bind what is known now; the residual is still a valid program.
//! let partial = program.partial(&Bindings::new().bind("foo", 2)).unwrap();
//! assert_eq!(partial.to_string(), "16");
//!
//! let value = program.evaluate(&Bindings::new().bind("foo", 2)).unwrap();
//! assert_eq!(value, 16.0);
//! ```
//!
//! # Errors
//!
//! Every failure is an [`Error`]. Use [`render_error`] or
//! [`render_error_to_string`] to show one against the program text.

mod error_renderer;

// Re-export public API from tsrpn_core
pub use tsrpn_core::api::{
    DEFAULT_DELIMITER, DEFAULT_SECONDS_PER_INTERVAL, Error, Program, ProgramOptions, Result,
    SyntaxError,
};

// Re-export binding types and series helpers
pub use tsrpn_core::bindings::{Binding, Bindings, Value};
pub use tsrpn_core::catalog::Operator;
pub use tsrpn_core::series::{self, Consolidation, Def, SeriesError, SparseSeries};
pub use tsrpn_core::token::Token;

pub use error_renderer::{ErrorReport, render_error, render_error_to_string};
