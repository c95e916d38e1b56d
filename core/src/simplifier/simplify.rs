use tracing::{debug, trace};

use super::clock::{self, Clock};
use super::operators::Step;
use super::{OpenBindings, Outcome};
use crate::api::{ProgramOptions, SyntaxError};
use crate::bindings::{Binding, Resolved};
use crate::catalog::Operator;
use crate::stack::{Stack, StackItem};
use crate::token::{TIME_NAMES, Token};

/// State of one simplification pass.
pub(super) struct Pass<'a> {
    pub(super) bindings: &'a Resolved,
    pub(super) seconds_per_interval: f64,
    pub(super) stack: Stack,
    pub(super) open: OpenBindings,
    clock: Option<Clock>,
}

/// Runs one pass over `tokens`.
///
/// With `substitute_time` unset, time-dependent names are never resolved and
/// are reported as open bindings instead, which keeps the result independent
/// of the wall clock.
pub fn simplify(
    tokens: &[Token],
    bindings: &Resolved,
    options: &ProgramOptions,
    capacity: usize,
    substitute_time: bool,
) -> Result<Outcome, SyntaxError> {
    let clock = if substitute_time {
        Some(Clock::capture(bindings)?)
    } else {
        None
    };
    let mut pass = Pass {
        bindings,
        seconds_per_interval: options.seconds_per_interval,
        stack: Stack::with_capacity(capacity),
        open: OpenBindings::default(),
        clock,
    };
    for token in tokens {
        match token {
            Token::Number(n) => pass.stack.push(StackItem::number(*n)),
            Token::Symbol(name) => pass.push_symbol(name)?,
        }
    }
    if !pass.open.is_empty() {
        debug!(open = ?pass.open.names(), "pass left open bindings");
    }
    Ok(Outcome {
        stack: pass.stack,
        open: pass.open,
    })
}

impl Pass<'_> {
    fn push_symbol(&mut self, name: &str) -> Result<(), SyntaxError> {
        if let Some(value) = constant(name, self.seconds_per_interval) {
            self.stack.push(StackItem::number(value));
            return Ok(());
        }
        if TIME_NAMES.contains(&name) {
            let resolved = match &self.clock {
                Some(clock) => clock.resolve(name, self.seconds_per_interval)?,
                None => None,
            };
            match resolved {
                Some(value) => self.stack.push(StackItem::number(value)),
                None => {
                    self.open.open(clock::open_key(name));
                    self.stack.push(StackItem::symbol(name));
                }
            }
            return Ok(());
        }
        if let Some(op) = Operator::from_name(name) {
            return self.apply(op);
        }
        match self.bindings.get(name) {
            Some(Binding::Scalar(value)) => self.stack.push(StackItem::number(*value)),
            // Series are only read in aggregate by the trend operators.
            Some(Binding::Series(_)) | None => {
                self.open.open(name);
                self.stack.push(StackItem::symbol(name));
            }
        }
        Ok(())
    }

    fn apply(&mut self, op: Operator) -> Result<(), SyntaxError> {
        let contract = op.contract();
        if self.stack.len() < contract.pop_count {
            return Err(SyntaxError::NotEnoughParameters {
                op,
                required: contract.pop_count,
            });
        }
        let step = if !self.stack.window(contract.numeric).iter().all(StackItem::is_numeric) {
            Step::Deferred("operand is not a number")
        } else if self
            .stack
            .window(contract.non_operator)
            .iter()
            .any(StackItem::is_pending_operator)
        {
            Step::Deferred("operand is a pending operator")
        } else {
            self.fold(op)?
        };
        if let Step::Deferred(reason) = step {
            trace!(operator = %op, reason, "deferred");
            self.stack.push(StackItem::symbol(op.name()));
        }
        Ok(())
    }
}

fn constant(name: &str, seconds_per_interval: f64) -> Option<f64> {
    let value = match name {
        "MINUTE" => 60.0,
        "HOUR" => 3_600.0,
        "DAY" => 86_400.0,
        "WEEK" => 604_800.0,
        "UNKN" => f64::NAN,
        "INF" => f64::INFINITY,
        "NEGINF" => f64::NEG_INFINITY,
        "STEPWIDTH" => seconds_per_interval,
        _ => return None,
    };
    Some(value)
}
