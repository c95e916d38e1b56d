//! Program tokens.
//!
//! A compiled program is a flat sequence of [`Token`]s. Numbers are classified
//! once at build time; everything else stays a [`Token::Symbol`] whose meaning
//! (constant, pseudo-variable, operator or free variable) is decided during
//! simplification.

use core::fmt;

use crate::api::SyntaxError;
use crate::catalog::Operator;

/// Named constants with a fixed value.
pub(crate) const CONSTANTS: &[&str] = &[
    "MINUTE", "HOUR", "DAY", "WEEK", "UNKN", "INF", "NEGINF", "STEPWIDTH",
];

/// Names whose value depends on the clock or on the `TIME` binding.
pub(crate) const TIME_NAMES: &[&str] = &[
    "NOW", "TIME", "LTIME", "NEWDAY", "NEWWEEK", "NEWMONTH", "NEWYEAR", "COUNT",
];

/// A single program element.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Symbol(String),
}

impl Token {
    pub fn symbol(name: impl Into<String>) -> Self {
        Token::Symbol(name.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Token::Number(n) => Some(*n),
            Token::Symbol(_) => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Token::Number(_) => None,
            Token::Symbol(s) => Some(s),
        }
    }

    /// True when this token names an operator that has not been folded yet.
    pub fn is_operator(&self) -> bool {
        self.as_symbol().and_then(Operator::from_name).is_some()
    }

    /// True for the pseudo-variables that require time substitution.
    pub fn is_time_sensitive(&self) -> bool {
        self.as_symbol().is_some_and(|s| TIME_NAMES.contains(&s))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) if n.is_nan() => f.write_str("UNKN"),
            Token::Number(n) if *n == f64::INFINITY => f.write_str("INF"),
            Token::Number(n) if *n == f64::NEG_INFINITY => f.write_str("NEGINF"),
            Token::Number(n) => f.write_str(&format_number(*n)),
            Token::Symbol(s) => f.write_str(s),
        }
    }
}

/// Splits `source` on `delimiter` and classifies every piece.
///
/// Reserved names are never read as numbers, so `INF` stays a constant even
/// though it would parse as a float.
pub fn tokenize(source: &str, delimiter: char) -> Result<Vec<Token>, SyntaxError> {
    if source.is_empty() {
        return Err(SyntaxError::EmptyExpression);
    }
    source
        .split(delimiter)
        .map(|piece| {
            if piece.is_empty() {
                return Err(SyntaxError::EmptyToken);
            }
            if is_reserved(piece) {
                return Ok(Token::symbol(piece));
            }
            Ok(match piece.parse::<f64>() {
                Ok(n) => Token::Number(n),
                Err(_) => Token::symbol(piece),
            })
        })
        .collect()
}

/// Joins tokens back into program text.
pub fn render(tokens: &[Token], delimiter: char) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        out.push_str(&token.to_string());
    }
    out
}

fn is_reserved(name: &str) -> bool {
    CONSTANTS.contains(&name) || TIME_NAMES.contains(&name) || Operator::from_name(name).is_some()
}

/// Shortest decimal text for a finite number.
///
/// Plain notation is used for exponents in `-4..21`, scientific notation
/// (`1e+21`, `1.5e-07`) outside it.
pub fn format_number(n: f64) -> String {
    if n == 0.0 || !n.is_finite() {
        return n.to_string();
    }
    let scientific = format!("{:e}", n);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    match exponent.parse::<i32>() {
        Ok(exponent) if !(-4..21).contains(&exponent) => {
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        _ => n.to_string(),
    }
}

/// Text for a number quoted inside an error message.
pub(crate) fn describe_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "+Inf".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format_number(n)
    }
}
