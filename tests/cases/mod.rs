//! Table-driven test cases shared by the integration tests.
//!
//! Each `test_case!` expands to one `#[test]` function:
//!
//! - `residual`: the program built with no bindings renders as this text
//! - `error`: building the program fails with this message
//! - `bindings` + `value`: evaluating with these bindings yields this number
//! - `bindings` + `partial`: partially applying these bindings renders as this text

#![allow(dead_code)]

use tsrpn::{Bindings, Program};

pub fn build(input: &str) -> Program {
    match Program::new(input) {
        Ok(program) => program,
        Err(err) => panic!("{}: unexpected error: {}", input, err),
    }
}

pub fn bindings(pairs: &[(&str, f64)]) -> Bindings {
    pairs.iter().map(|(name, value)| (*name, *value)).collect()
}

macro_rules! test_case {
    ($name:ident, input: $input:expr, residual: $residual:expr $(,)?) => {
        #[test]
        fn $name() {
            pretty_assertions::assert_eq!(cases::build($input).to_string(), $residual);
        }
    };
    ($name:ident, input: $input:expr, error: $error:expr $(,)?) => {
        #[test]
        fn $name() {
            let err = tsrpn::Program::new($input).unwrap_err();
            pretty_assertions::assert_eq!(err.to_string(), $error);
        }
    };
    ($name:ident, input: $input:expr, bindings: [$($pair:expr),* $(,)?], value: $value:expr $(,)?) => {
        #[test]
        fn $name() {
            let bindings = cases::bindings(&[$($pair),*]);
            let value = cases::build($input).evaluate(&bindings).unwrap();
            assert_eq!(value, $value);
        }
    };
    ($name:ident, input: $input:expr, bindings: [$($pair:expr),* $(,)?], partial: $partial:expr $(,)?) => {
        #[test]
        fn $name() {
            let bindings = cases::bindings(&[$($pair),*]);
            let partial = cases::build($input).partial(&bindings).unwrap();
            pretty_assertions::assert_eq!(partial.to_string(), $partial);
        }
    };
}
