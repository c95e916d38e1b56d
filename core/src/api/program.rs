//! Compiled RPN programs.

use core::fmt;
use core::str::FromStr;

use tracing::debug;

use super::{Error, ProgramOptions, Result, SyntaxError};
use crate::bindings::Bindings;
use crate::simplifier::{Outcome, simplify};
use crate::token::{self, Token};

/// A compiled, already-simplified RPN program.
///
/// Building a program folds everything that does not depend on a binding, so
/// the rendered text of a fresh program is already its residual form. A
/// program is immutable: [`Program::partial`] returns a new program and every
/// call works on its own stack, so a single program can be shared freely.
///
/// # Example
///
/// ```
/// use tsrpn_core::api::Program;
/// use tsrpn_core::bindings::Bindings;
///
/// let program = Program::new("5,3,+,foo,*").unwrap();
/// assert_eq!(program.to_string(), "8,foo,*");
/// assert_eq!(program.open_bindings(), ["foo"]);
///
/// let value = program.evaluate(&Bindings::new().bind("foo", 2)).unwrap();
/// assert_eq!(value, 16.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    options: ProgramOptions,

    /// Residual tokens, bottom of the stack first.
    tokens: Vec<Token>,

    /// Set when the source mentioned a clock or `TIME`-derived name. Carried
    /// over to every partial application so `evaluate` still substitutes them.
    performs_time_substitution: bool,

    /// Initial capacity of the per-call working stack.
    stack_capacity: usize,

    /// Open bindings left by the pass that produced this program, sorted.
    open: Vec<String>,
}

impl Program {
    /// Compiles `source` with the default options.
    pub fn new(source: &str) -> Result<Self> {
        Self::with_options(source, ProgramOptions::default())
    }

    /// Compiles `source` and folds whatever can be folded without bindings.
    pub fn with_options(source: &str, options: ProgramOptions) -> Result<Self> {
        options.validate()?;
        let tokens = token::tokenize(source, options.delimiter)?;
        let performs_time_substitution = tokens.iter().any(Token::is_time_sensitive);
        let duplicates = tokens
            .iter()
            .filter(|t| t.as_symbol() == Some("DUP"))
            .count();
        let stack_capacity = tokens.len() + duplicates;
        debug!(
            tokens = tokens.len(),
            stack_capacity, performs_time_substitution, "building program"
        );

        let compiled = Self {
            options,
            tokens,
            performs_time_substitution,
            stack_capacity,
            open: Vec::new(),
        };
        compiled.partial(&Bindings::new())
    }

    /// Binds what `bindings` provides and returns the residual program.
    ///
    /// Time-dependent names are never substituted here, so the result only
    /// depends on `self` and `bindings` and can be cached.
    ///
    /// ```
    /// use tsrpn_core::api::Program;
    /// use tsrpn_core::bindings::Bindings;
    ///
    /// let program = Program::new("foo,1000,*,bar,/").unwrap();
    /// let partial = program.partial(&Bindings::new().bind("bar", 16)).unwrap();
    /// assert_eq!(partial.to_string(), "foo,1000,*,16,/");
    /// ```
    pub fn partial(&self, bindings: &Bindings) -> Result<Program> {
        let outcome = self.run(bindings, false)?;
        Ok(Program {
            options: self.options,
            tokens: outcome.stack.into_tokens(),
            performs_time_substitution: self.performs_time_substitution,
            stack_capacity: self.stack_capacity,
            open: outcome.open.names(),
        })
    }

    /// Binds `bindings`, substitutes the clock and returns the single number
    /// the program reduces to.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64> {
        let Outcome { stack, open } = self.run(bindings, self.performs_time_substitution)?;

        let open = open.names();
        if !open.is_empty() {
            return Err(Error::OpenBindings(open));
        }
        match stack.len() {
            0 => Err(SyntaxError::EmptyStack.into()),
            1 => {
                let item = stack.item(1);
                item.as_number().ok_or_else(|| Error::ExpectedFloat {
                    found: item.to_string(),
                })
            }
            _ => {
                let rendered = token::render(&stack.into_tokens(), self.options.delimiter);
                Err(SyntaxError::ExtraParameters(rendered).into())
            }
        }
    }

    /// Reports whether some assignment of the open bindings could reduce the
    /// program to a single number.
    ///
    /// Every open name is bound to `0` until nothing is left open.
    pub fn is_valid(&self) -> bool {
        let mut bindings = Bindings::new();
        loop {
            let outcome = match self.run(&bindings, self.performs_time_substitution) {
                Ok(outcome) => outcome,
                Err(_) => return false,
            };
            let open = outcome.open.names();
            if open.is_empty() {
                return outcome.stack.len() == 1 && outcome.stack.item(1).is_numeric();
            }
            // TODO: bind TREND labels to a series long enough for their window
            // so programs using TREND can validate.
            let mut progressed = false;
            for name in open {
                if bindings.get(&name).is_none() {
                    bindings.insert(name, 0.0);
                    progressed = true;
                }
            }
            if !progressed {
                return false;
            }
        }
    }

    /// Names still unresolved in this program, sorted.
    ///
    /// Every occurrence that was not bound is counted, including occurrences a
    /// fold later discarded: `1,a,b,IF` renders as `a` but reports `a` and `b`.
    pub fn open_bindings(&self) -> &[String] {
        &self.open
    }

    pub fn performs_time_substitution(&self) -> bool {
        self.performs_time_substitution
    }

    pub fn options(&self) -> &ProgramOptions {
        &self.options
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn run(&self, bindings: &Bindings, substitute_time: bool) -> Result<Outcome> {
        let resolved = bindings.resolve()?;
        let outcome = simplify(
            &self.tokens,
            &resolved,
            &self.options,
            self.stack_capacity,
            substitute_time,
        )?;
        Ok(outcome)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&token::render(&self.tokens, self.options.delimiter))
    }
}

impl FromStr for Program {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        Program::new(source)
    }
}
