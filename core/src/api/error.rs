//! Public error types for tsrpn programs.
//!
//! Every failure a caller can observe is an [`Error`]. Structural problems with
//! the program text or its operands are a [`SyntaxError`], carried inside
//! [`Error::Syntax`]. Both keep structured fields and only produce text through
//! `Display`.

use thiserror::Error;

use crate::catalog::Operator;
use crate::token::describe_number;

/// Result type alias for tsrpn operations
pub type Result<T> = core::result::Result<T, Error>;

/// Top-level error returned by [`Program`](crate::api::Program) operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The program text or its operands are malformed.
    #[error("syntax error : {0}")]
    Syntax(#[from] SyntaxError),

    /// Evaluation was requested while symbols are still unresolved.
    ///
    /// Names are sorted so the message is stable.
    #[error("open bindings: {}", .0.join(","))]
    OpenBindings(Vec<String>),

    /// A binding value cannot be coerced to a number or a series of numbers.
    #[error("bad binding type for \"{key}\": {kind}")]
    BadBindingType { key: String, kind: String },

    /// The program reduced to a single item that is not a number.
    #[error("expected float: {found}")]
    ExpectedFloat { found: String },
}

/// Reasons a program fails to build or simplify.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("empty expression")]
    EmptyExpression,

    #[error("empty token")]
    EmptyToken,

    #[error("cannot use {0} operator for delimiter")]
    BadDelimiter(char),

    #[error("cannot use {} seconds as interval", describe_number(*.0))]
    BadInterval(f64),

    #[error("not enough parameters: operator {op} requires {required} operands")]
    NotEnoughParameters { op: Operator, required: usize },

    /// A count, rotation or percentile parameter is not usable.
    #[error("{op} operator requires positive finite integer: {}", describe_number(*.value))]
    NotPositiveInteger { op: Operator, value: f64 },

    #[error("{op} operand requires {required} items, but only {available} on stack")]
    InsufficientStack {
        op: Operator,
        required: usize,
        available: usize,
    },

    #[error("PERCENT operator requires percentile no greater than 100: {}", describe_number(*.0))]
    PercentileOutOfRange(f64),

    #[error("{op} operator requires label but found number: {}", describe_number(*.value))]
    ExpectedLabel { op: Operator, value: f64 },

    #[error("{op} operand specifies {label:?} label, which is not a series of numbers")]
    NotASeries { op: Operator, label: String },

    #[error("{op} operand specifies {required} values, but only {available} available")]
    SeriesTooShort {
        op: Operator,
        required: usize,
        available: usize,
    },

    #[error("TIME ought to be bound to number rather than series")]
    TimeNotNumeric,

    #[error("TIME binding out of range: {}", describe_number(*.0))]
    TimeOutOfRange(f64),

    /// More than one item is left after a full evaluation.
    #[error("extra parameters: {0}")]
    ExtraParameters(String),

    #[error("empty stack")]
    EmptyStack,
}
