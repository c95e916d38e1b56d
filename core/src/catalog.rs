//! The operator catalog.
//!
//! Every operator the simplifier understands is a variant of [`Operator`].
//! Its [`Contract`] says how many stack items it consumes and which of those
//! must already be numbers before a fold is attempted.

use core::fmt;

/// A contiguous run of stack slots, counted from the top of the stack.
///
/// `offset` is the distance from the top to the first slot of the window, so
/// a window with `offset == 2, len == 1` covers the second item from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub len: usize,
}

impl Window {
    pub const NONE: Window = Window { offset: 0, len: 0 };

    pub const fn new(offset: usize, len: usize) -> Self {
        Window { offset, len }
    }

    /// Absolute stack indices covered by this window for a stack of `depth` items.
    pub fn indices(&self, depth: usize) -> core::ops::Range<usize> {
        let start = depth - self.offset;
        start..start + self.len
    }
}

/// Arity contract for one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    /// Items consumed from the top of the stack.
    pub pop_count: usize,
    /// Items that must already be numbers for a fold to be attempted.
    pub numeric: Window,
    /// Items that must not be operators still waiting for operands.
    pub non_operator: Window,
}

impl Contract {
    const fn new(pop_count: usize, numeric: Window) -> Self {
        Contract {
            pop_count,
            numeric,
            non_operator: Window::new(pop_count, pop_count),
        }
    }

    const fn untyped(pop_count: usize) -> Self {
        Self::new(pop_count, Window::NONE)
    }

    const fn numeric(pop_count: usize) -> Self {
        Self::new(pop_count, Window::new(pop_count, pop_count))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Abs,
    AddNan,
    Atan,
    Atan2,
    Ceil,
    Cos,
    Deg2Rad,
    Exp,
    Floor,
    IsInf,
    Log,
    Rad2Deg,
    Sin,
    Sqrt,
    Un,
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
    Max,
    Min,
    MaxNan,
    MinNan,
    If,
    Limit,
    Dup,
    Exc,
    Pop,
    Depth,
    Copy,
    Index,
    Rev,
    Roll,
    Sort,
    Avg,
    Median,
    Mad,
    Smin,
    Smax,
    Stdev,
    Percent,
    Trend,
    TrendNan,
}

impl Operator {
    pub const ALL: [Operator; 51] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Mod,
        Operator::Pow,
        Operator::Abs,
        Operator::AddNan,
        Operator::Atan,
        Operator::Atan2,
        Operator::Ceil,
        Operator::Cos,
        Operator::Deg2Rad,
        Operator::Exp,
        Operator::Floor,
        Operator::IsInf,
        Operator::Log,
        Operator::Rad2Deg,
        Operator::Sin,
        Operator::Sqrt,
        Operator::Un,
        Operator::Eq,
        Operator::Ne,
        Operator::Ge,
        Operator::Gt,
        Operator::Le,
        Operator::Lt,
        Operator::Max,
        Operator::Min,
        Operator::MaxNan,
        Operator::MinNan,
        Operator::If,
        Operator::Limit,
        Operator::Dup,
        Operator::Exc,
        Operator::Pop,
        Operator::Depth,
        Operator::Copy,
        Operator::Index,
        Operator::Rev,
        Operator::Roll,
        Operator::Sort,
        Operator::Avg,
        Operator::Median,
        Operator::Mad,
        Operator::Smin,
        Operator::Smax,
        Operator::Stdev,
        Operator::Percent,
        Operator::Trend,
        Operator::TrendNan,
    ];

    /// Looks up an operator by its case-sensitive program name.
    pub fn from_name(name: &str) -> Option<Operator> {
        let op = match name {
            "+" => Operator::Add,
            "-" => Operator::Sub,
            "*" => Operator::Mul,
            "/" => Operator::Div,
            "%" => Operator::Mod,
            "POW" => Operator::Pow,
            "ABS" => Operator::Abs,
            "ADDNAN" => Operator::AddNan,
            "ATAN" => Operator::Atan,
            "ATAN2" => Operator::Atan2,
            "CEIL" => Operator::Ceil,
            "COS" => Operator::Cos,
            "DEG2RAD" => Operator::Deg2Rad,
            "EXP" => Operator::Exp,
            "FLOOR" => Operator::Floor,
            "ISINF" => Operator::IsInf,
            "LOG" => Operator::Log,
            "RAD2DEG" => Operator::Rad2Deg,
            "SIN" => Operator::Sin,
            "SQRT" => Operator::Sqrt,
            "UN" => Operator::Un,
            "EQ" => Operator::Eq,
            "NE" => Operator::Ne,
            "GE" => Operator::Ge,
            "GT" => Operator::Gt,
            "LE" => Operator::Le,
            "LT" => Operator::Lt,
            "MAX" => Operator::Max,
            "MIN" => Operator::Min,
            "MAXNAN" => Operator::MaxNan,
            "MINNAN" => Operator::MinNan,
            "IF" => Operator::If,
            "LIMIT" => Operator::Limit,
            "DUP" => Operator::Dup,
            "EXC" => Operator::Exc,
            "POP" => Operator::Pop,
            "DEPTH" => Operator::Depth,
            "COPY" => Operator::Copy,
            "INDEX" => Operator::Index,
            "REV" => Operator::Rev,
            "ROLL" => Operator::Roll,
            "SORT" => Operator::Sort,
            "AVG" => Operator::Avg,
            "MEDIAN" => Operator::Median,
            "MAD" => Operator::Mad,
            "SMIN" => Operator::Smin,
            "SMAX" => Operator::Smax,
            "STDEV" => Operator::Stdev,
            "PERCENT" => Operator::Percent,
            "TREND" => Operator::Trend,
            "TRENDNAN" => Operator::TrendNan,
            _ => return None,
        };
        Some(op)
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Pow => "POW",
            Operator::Abs => "ABS",
            Operator::AddNan => "ADDNAN",
            Operator::Atan => "ATAN",
            Operator::Atan2 => "ATAN2",
            Operator::Ceil => "CEIL",
            Operator::Cos => "COS",
            Operator::Deg2Rad => "DEG2RAD",
            Operator::Exp => "EXP",
            Operator::Floor => "FLOOR",
            Operator::IsInf => "ISINF",
            Operator::Log => "LOG",
            Operator::Rad2Deg => "RAD2DEG",
            Operator::Sin => "SIN",
            Operator::Sqrt => "SQRT",
            Operator::Un => "UN",
            Operator::Eq => "EQ",
            Operator::Ne => "NE",
            Operator::Ge => "GE",
            Operator::Gt => "GT",
            Operator::Le => "LE",
            Operator::Lt => "LT",
            Operator::Max => "MAX",
            Operator::Min => "MIN",
            Operator::MaxNan => "MAXNAN",
            Operator::MinNan => "MINNAN",
            Operator::If => "IF",
            Operator::Limit => "LIMIT",
            Operator::Dup => "DUP",
            Operator::Exc => "EXC",
            Operator::Pop => "POP",
            Operator::Depth => "DEPTH",
            Operator::Copy => "COPY",
            Operator::Index => "INDEX",
            Operator::Rev => "REV",
            Operator::Roll => "ROLL",
            Operator::Sort => "SORT",
            Operator::Avg => "AVG",
            Operator::Median => "MEDIAN",
            Operator::Mad => "MAD",
            Operator::Smin => "SMIN",
            Operator::Smax => "SMAX",
            Operator::Stdev => "STDEV",
            Operator::Percent => "PERCENT",
            Operator::Trend => "TREND",
            Operator::TrendNan => "TRENDNAN",
        }
    }

    pub fn contract(self) -> Contract {
        use Operator::*;
        match self {
            // Arithmetic folds a few identities with one symbolic operand,
            // so neither operand has to be numeric up front.
            Add | Sub | Mul | Div | Mod | Pow => Contract::untyped(2),

            Abs | Atan | Ceil | Cos | Deg2Rad | Exp | Floor | IsInf | Log | Rad2Deg | Sin
            | Sqrt | Un => Contract::numeric(1),
            AddNan | Atan2 => Contract::numeric(2),

            Eq | Ne | Ge | Gt | Le | Lt | Max | Min | MaxNan | MinNan => Contract::untyped(2),

            // a,b,c,IF: only the predicate has to be known.
            If => Contract::new(3, Window::new(3, 1)),
            Limit => Contract::numeric(3),

            Dup | Pop => Contract::untyped(1),
            Exc => Contract::untyped(2),
            Depth => Contract::untyped(0),

            Copy | Index | Rev | Sort | Avg | Median | Mad | Smin | Smax | Stdev => {
                Contract::numeric(1)
            }
            // n,m,ROLL and p,n,PERCENT
            Roll | Percent => Contract::numeric(2),
            // label,seconds,TREND
            Trend | TrendNan => Contract::new(2, Window::new(1, 1)),
        }
    }

    /// True for operators that take a leading item count from the stack.
    pub fn is_counted(self) -> bool {
        use Operator::*;
        matches!(
            self,
            Copy | Index | Rev | Roll | Sort | Avg | Median | Mad | Smin | Smax | Stdev | Percent
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
