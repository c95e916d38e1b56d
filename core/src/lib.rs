//! Partial evaluation of RRDtool-style RPN expressions.
//!
//! Programs are comma-separated postfix expressions such as `qps,1000,*`.
//! Building one folds every operator whose operands are already known;
//! [`api::Program::partial`] folds further as bindings arrive and
//! [`api::Program::evaluate`] reduces the program to a single number.

pub mod api;
pub mod bindings;
pub mod catalog;
pub mod series;
pub mod simplifier;
pub mod stack;
pub mod token;
