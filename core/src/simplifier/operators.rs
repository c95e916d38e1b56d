//! Per-operator folds.
//!
//! By the time [`Pass::fold`] runs, the operator's contract has been checked:
//! its numeric window holds numbers and its popped window holds no pending
//! operators. Each arm either rewrites the stack and reports
//! [`Step::Folded`], or leaves the stack untouched and reports
//! [`Step::Deferred`] so the operator is pushed back unresolved.

use core::f64::consts::PI;

use super::aggregate;
use super::simplify::Pass;
use crate::api::SyntaxError;
use crate::bindings::Binding;
use crate::catalog::Operator;
use crate::stack::StackItem;
use crate::token::Token;

pub(super) enum Step {
    Folded,
    Deferred(&'static str),
}

impl Pass<'_> {
    pub(super) fn fold(&mut self, op: Operator) -> Result<Step, SyntaxError> {
        use Operator::*;
        let step = match op {
            Add | Sub | Mul | Div | Mod | Pow => {
                let result = arithmetic(op, self.stack.item(2), self.stack.item(1));
                self.replace(2, result)
            }

            Abs => self.unary(f64::abs),
            Atan => self.unary(f64::atan),
            Ceil => self.unary(f64::ceil),
            Cos => self.unary(f64::cos),
            Deg2Rad => self.unary(|x| x * PI / 180.0),
            Exp => self.unary(f64::exp),
            Floor => self.unary(f64::floor),
            IsInf => self.unary(|x| truth(x.is_infinite())),
            Log => self.unary(f64::ln),
            Rad2Deg => self.unary(|x| x * 180.0 / PI),
            Sin => self.unary(f64::sin),
            Sqrt => self.unary(f64::sqrt),
            Un => self.unary(|x| truth(x.is_nan())),

            AddNan => self.binary(|a, b| match (a.is_nan(), b.is_nan()) {
                (false, false) => a + b,
                (false, true) => a,
                _ => b,
            }),
            Atan2 => self.binary(|a, b| b.atan2(a)),

            Eq | Ne | Ge | Gt | Le | Lt => {
                let result = compare(op, self.stack.item(2), self.stack.item(1));
                self.replace(2, result)
            }
            Max | Min | MaxNan | MinNan => {
                let result = extreme(op, self.stack.item(2), self.stack.item(1));
                self.replace(2, result)
            }

            If => {
                let predicate = self.number(3);
                let depth = if predicate < 0.0 || predicate > 0.0 { 2 } else { 1 };
                let chosen = self.stack.item(depth).clone();
                self.stack.replace_top(3, chosen);
                Step::Folded
            }
            Limit => {
                let (value, low, high) = (self.number(3), self.number(2), self.number(1));
                let limited = [value, low, high];
                let result = if limited.iter().any(|v| v.is_nan() || *v == f64::NEG_INFINITY) {
                    f64::NAN
                } else if value < low || value > high {
                    f64::NAN
                } else {
                    value
                };
                self.stack.replace_top(3, StackItem::number(result));
                Step::Folded
            }

            Dup => {
                let top = self.stack.item(1).clone();
                self.stack.push(top);
                Step::Folded
            }
            Exc => {
                self.stack.swap_top();
                Step::Folded
            }
            Pop => {
                self.stack.pop();
                Step::Folded
            }
            // Counts stack slots, pending operators included.
            Depth => {
                let depth = self.stack.len() as f64;
                self.stack.push(StackItem::number(depth));
                Step::Folded
            }

            Copy => {
                let n = self.count(op)?;
                if self.any_pending(1, n) {
                    return Ok(Step::Deferred("window holds a pending operator"));
                }
                self.stack.pop();
                self.stack.extend_from_within(0, n);
                Step::Folded
            }
            Index => {
                let n = self.count(op)?;
                if self.any_pending(1, n) {
                    return Ok(Step::Deferred("window holds a pending operator"));
                }
                let item = self.stack.below(1, n)[0].clone();
                self.stack.replace_top(1, item);
                Step::Folded
            }
            Rev => {
                let n = self.count(op)?;
                if self.any_pending(1, n) {
                    return Ok(Step::Deferred("window holds a pending operator"));
                }
                self.stack.pop();
                self.stack.below_mut(0, n).reverse();
                Step::Folded
            }
            Sort => {
                let n = self.count(op)?;
                let Some(mut values) = self.numbers_below(1, n) else {
                    return Ok(Step::Deferred("window is not all numbers"));
                };
                aggregate::sort(&mut values);
                self.stack.pop();
                for (slot, value) in self.stack.below_mut(0, n).iter_mut().zip(values) {
                    *slot = StackItem::number(value);
                }
                Step::Folded
            }
            Roll => self.roll()?,

            Avg | Stdev => {
                let n = self.count(op)?;
                let Some(values) = self.numbers_below(1, n) else {
                    return Ok(Step::Deferred("window is not all numbers"));
                };
                let result = if op == Avg {
                    aggregate::mean(&values)
                } else {
                    aggregate::stdev(&values)
                };
                self.stack.replace_top(n + 1, StackItem::number(result));
                Step::Folded
            }
            Median | Mad | Smin | Smax => {
                let n = self.count(op)?;
                if n == 1 {
                    let item = self.stack.item(2).clone();
                    if item.is_pending_operator() {
                        return Ok(Step::Deferred("window holds a pending operator"));
                    }
                    self.stack.replace_top(2, item);
                    return Ok(Step::Folded);
                }
                let Some(mut values) = self.numbers_below(1, n) else {
                    return Ok(Step::Deferred("window is not all numbers"));
                };
                let result = match op {
                    Median => aggregate::median(&mut values),
                    Mad => aggregate::mad(&mut values),
                    // Seeded with the item nearest the top, as RRDtool does.
                    _ => {
                        let (rest, seed) = values.split_at(n - 1);
                        aggregate::extremum(seed[0], rest, op == Smax)
                    }
                };
                self.stack.replace_top(n + 1, StackItem::number(result));
                Step::Folded
            }
            Percent => self.percent()?,
            Trend | TrendNan => self.trend(op)?,
        };
        Ok(step)
    }

    fn unary(&mut self, f: impl FnOnce(f64) -> f64) -> Step {
        let result = f(self.number(1));
        self.stack.replace_top(1, StackItem::number(result));
        Step::Folded
    }

    fn binary(&mut self, f: impl FnOnce(f64, f64) -> f64) -> Step {
        let result = f(self.number(2), self.number(1));
        self.stack.replace_top(2, StackItem::number(result));
        Step::Folded
    }

    fn replace(&mut self, count: usize, result: Option<StackItem>) -> Step {
        match result {
            Some(item) => {
                self.stack.replace_top(count, item);
                Step::Folded
            }
            None => Step::Deferred("no rule folds these operands"),
        }
    }

    /// Number at `depth`. Callers only ask for slots the contract made numeric.
    fn number(&self, depth: usize) -> f64 {
        self.stack.number(depth).unwrap_or(f64::NAN)
    }

    /// Reads and validates the item count on top of the stack.
    fn count(&self, op: Operator) -> Result<usize, SyntaxError> {
        let n = positive_integer(op, self.number(1))?;
        let available = self.stack.len() - 1;
        if n > available {
            return Err(SyntaxError::InsufficientStack {
                op,
                required: n,
                available,
            });
        }
        Ok(n)
    }

    fn any_pending(&self, skip: usize, len: usize) -> bool {
        self.stack
            .below(skip, len)
            .iter()
            .any(StackItem::is_pending_operator)
    }

    fn numbers_below(&self, skip: usize, len: usize) -> Option<Vec<f64>> {
        self.stack
            .below(skip, len)
            .iter()
            .map(StackItem::as_number)
            .collect()
    }

    /// `n,m,ROLL`: rotates the `n` items below the parameters by `m` toward the top.
    fn roll(&mut self) -> Result<Step, SyntaxError> {
        let op = Operator::Roll;
        let depth = self.stack.len();
        let n = positive_integer(op, self.number(2))?;
        if n > depth - 1 {
            return Err(SyntaxError::InsufficientStack {
                op,
                required: n,
                available: depth - 1,
            });
        }
        let m_value = self.number(1);
        if !m_value.is_finite() || m_value.fract() != 0.0 {
            return Err(SyntaxError::NotPositiveInteger { op, value: m_value });
        }
        let m = m_value as i64;
        if m > (depth - 1) as i64 {
            return Err(SyntaxError::InsufficientStack {
                op,
                required: m as usize,
                available: depth - 1,
            });
        }
        if n > depth - 2 {
            return Err(SyntaxError::InsufficientStack {
                op,
                required: n,
                available: depth - 2,
            });
        }
        if self.any_pending(2, n) {
            return Ok(Step::Deferred("window holds a pending operator"));
        }
        let shift = m.rem_euclid(n as i64) as usize;
        self.stack.below_mut(2, n).rotate_right(shift);
        self.stack.drop_top(2);
        Ok(Step::Folded)
    }

    /// `p,n,PERCENT`: nearest-rank `p`th percentile of the `n` items below.
    fn percent(&mut self) -> Result<Step, SyntaxError> {
        let op = Operator::Percent;
        let percent = self.number(2);
        if !percent.is_finite() || percent <= 0.0 {
            return Err(SyntaxError::NotPositiveInteger { op, value: percent });
        }
        if percent > 100.0 {
            return Err(SyntaxError::PercentileOutOfRange(percent));
        }
        let n = positive_integer(op, self.number(1))?;
        let available = self.stack.len() - 2;
        if n > available {
            return Err(SyntaxError::InsufficientStack {
                op,
                required: n,
                available,
            });
        }
        let Some(mut values) = self.numbers_below(2, n) else {
            return Ok(Step::Deferred("window is not all numbers"));
        };
        let result = aggregate::percentile(&mut values, percent);
        self.stack.replace_top(n + 2, StackItem::number(result));
        Ok(Step::Folded)
    }

    /// `label,seconds,TREND`: average of the trailing samples of a bound series.
    fn trend(&mut self, op: Operator) -> Result<Step, SyntaxError> {
        let seconds = self.number(1);
        if seconds.is_nan() || seconds <= 0.0 || seconds == f64::INFINITY {
            return Err(SyntaxError::NotPositiveInteger { op, value: seconds });
        }
        let samples = (seconds / self.seconds_per_interval).ceil() as usize;
        let label = match self.stack.item(2).token() {
            Token::Number(value) => {
                return Err(SyntaxError::ExpectedLabel { op, value: *value });
            }
            Token::Symbol(label) => label.clone(),
        };
        let bindings = self.bindings;
        let series = match bindings.get(&label) {
            None => return Ok(Step::Deferred("series is not bound")),
            Some(Binding::Scalar(_)) => return Err(SyntaxError::NotASeries { op, label }),
            Some(Binding::Series(series)) => series,
        };
        if samples > series.len() {
            return Err(SyntaxError::SeriesTooShort {
                op,
                required: samples,
                available: series.len(),
            });
        }
        let result = aggregate::trend(series, samples, op == Operator::TrendNan);
        self.open.close(&label);
        self.stack.replace_top(2, StackItem::number(result));
        Ok(Step::Folded)
    }
}

fn truth(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

fn positive_integer(op: Operator, value: f64) -> Result<usize, SyntaxError> {
    if value.is_finite() && value > 0.0 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(SyntaxError::NotPositiveInteger { op, value })
    }
}

/// Folds `a,b,op` for the arithmetic operators, including the identities that
/// hold when one operand is still a symbol.
fn arithmetic(op: Operator, a: &StackItem, b: &StackItem) -> Option<StackItem> {
    use Operator::*;
    let number = |v| Some(StackItem::number(v));
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => number(match op {
            Add => x + y,
            Sub => x - y,
            Mul => x * y,
            Div => x / y,
            Mod => x % y,
            Pow => x.powf(y),
            _ => return None,
        }),
        (Some(x), None) => match op {
            Add if x == 0.0 => Some(b.clone()),
            Mul | Div | Pow if x == 0.0 => number(0.0),
            Mul if x == 1.0 => Some(b.clone()),
            Pow if x == 1.0 => number(1.0),
            _ => None,
        },
        (None, Some(y)) => match op {
            Add | Sub if y == 0.0 => Some(a.clone()),
            Mul if y == 0.0 => number(0.0),
            Div | Mod if y == 0.0 => number(f64::NAN),
            Pow if y == 0.0 => number(1.0),
            Mul | Div | Pow if y == 1.0 => Some(a.clone()),
            Mod if y == 1.0 => number(0.0),
            _ => None,
        },
        (None, None) => None,
    }
}

/// Folds the comparison operators.
///
/// The ordering comparisons yield NaN when either side is NaN; `EQ` and `NE`
/// do not. Two identical symbols compare as equal.
fn compare(op: Operator, a: &StackItem, b: &StackItem) -> Option<StackItem> {
    use Operator::*;
    let result = match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => match op {
            Eq => truth(x == y),
            Ne => truth(x != y),
            _ if x.is_nan() || y.is_nan() => f64::NAN,
            Ge => truth(x >= y),
            Gt => truth(x > y),
            Le => truth(x <= y),
            Lt => truth(x < y),
            _ => return None,
        },
        (None, None) if a.token() == b.token() => truth(matches!(op, Eq | Ge | Le)),
        _ => return None,
    };
    Some(StackItem::number(result))
}

/// Folds `MAX`, `MIN` and their NaN-skipping variants.
fn extreme(op: Operator, a: &StackItem, b: &StackItem) -> Option<StackItem> {
    use Operator::*;
    let skip_nan = matches!(op, MaxNan | MinNan);
    let (x, y) = (a.as_number(), b.as_number());
    if x.is_some_and(f64::is_nan) {
        return Some(if skip_nan { b } else { a }.clone());
    }
    if y.is_some_and(f64::is_nan) {
        return Some(if skip_nan { a } else { b }.clone());
    }
    match (x, y) {
        (Some(x), Some(y)) if matches!(op, Max | MaxNan) => Some(StackItem::number(larger(x, y))),
        (Some(x), Some(y)) => Some(StackItem::number(smaller(x, y))),
        (None, None) if a.token() == b.token() => Some(a.clone()),
        _ => None,
    }
}

fn larger(x: f64, y: f64) -> f64 {
    if x == 0.0 && y == 0.0 {
        if x.is_sign_negative() { y } else { x }
    } else if x > y {
        x
    } else {
        y
    }
}

fn smaller(x: f64, y: f64) -> f64 {
    if x == 0.0 && y == 0.0 {
        if x.is_sign_negative() { x } else { y }
    } else if x < y {
        x
    } else {
        y
    }
}
