/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Expression tokens and the rules for how they join onto the text typed so far.

use crate::session::Variable;
use regex::Regex;
use std::sync::LazyLock;

static TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9.]+(e[-+]?[0-9]+)?$").unwrap());

#[derive(Debug, Copy, Clone, strum_macros::Display, PartialEq, Eq)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "^")]
    Pow,
}

impl BinaryOp {
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' | '−' => Some(BinaryOp::Sub),
            '*' | '×' => Some(BinaryOp::Mul),
            '/' | '÷' => Some(BinaryOp::Div),
            '^' => Some(BinaryOp::Pow),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, strum_macros::Display, PartialEq, Eq)]
pub enum PostfixOp {
    #[strum(serialize = "!")]
    Factorial,
    #[strum(serialize = "%")]
    Percent,
}

impl PostfixOp {
    pub fn symbol(self) -> char {
        match self {
            PostfixOp::Factorial => '!',
            PostfixOp::Percent => '%',
        }
    }
}

#[derive(Debug, Copy, Clone, strum_macros::Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    /// Natural logarithm
    Log,
    Log10,
    Sqrt,
    Cbrt,
    Exp,
    Abs,
}

impl Function {
    pub const ALL: [Function; 12] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Log,
        Function::Log10,
        Function::Sqrt,
        Function::Cbrt,
        Function::Exp,
        Function::Abs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Log => "log",
            Function::Log10 => "log10",
            Function::Sqrt => "sqrt",
            Function::Cbrt => "cbrt",
            Function::Exp => "exp",
            Function::Abs => "abs",
        }
    }

    /// Text appended to the expression, including the opening delimiter
    pub fn token(self) -> String {
        format!("{}(", self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

#[derive(Debug, Copy, Clone, strum_macros::Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }
}

/// Class of the text at the end of an expression
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Trailing {
    Empty,
    /// A digit or decimal point
    Digit,
    Operator,
    OpenParen,
    CloseParen,
    Postfix,
    /// A function name not yet followed by its parenthesis
    FunctionName,
    Variable,
    Constant,
    /// Anything else, e.g. a partial name left by backspace
    Other,
}

/// Class of the operand about to be inserted
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A digit typed onto the current number
    Number,
    /// A complete number recalled from memory or the last result
    Value,
    Constant,
    Variable,
    Function,
    OpenParen,
}

pub fn is_operator(c: char) -> bool {
    BinaryOp::from_symbol(c).is_some()
}

pub fn classify(expr: &str) -> Trailing {
    let Some(last) = expr.chars().last() else {
        return Trailing::Empty;
    };
    // log10 ends in a digit
    if Function::ALL.iter().any(|f| expr.ends_with(f.name())) {
        return Trailing::FunctionName;
    }
    match last {
        '0'..='9' | '.' => Trailing::Digit,
        '(' => Trailing::OpenParen,
        ')' => Trailing::CloseParen,
        '!' | '%' => Trailing::Postfix,
        c if is_operator(c) => Trailing::Operator,
        _ => {
            if expr.ends_with(Constant::Pi.name()) || expr.ends_with(Constant::E.name()) {
                Trailing::Constant
            } else if Variable::ALL.iter().any(|v| expr.ends_with(v.name())) {
                Trailing::Variable
            } else {
                Trailing::Other
            }
        }
    }
}

/// Whether an explicit `*` goes between the trailing text and the next operand.
pub fn implicit_multiply(trailing: Trailing, next: Operand) -> bool {
    match (trailing, next) {
        (Trailing::Digit, Operand::Number) => false,
        (Trailing::Digit, _) => true,
        (Trailing::CloseParen | Trailing::Variable | Trailing::Constant | Trailing::Postfix, _) => {
            true
        }
        (
            Trailing::Empty
            | Trailing::Operator
            | Trailing::OpenParen
            | Trailing::FunctionName
            | Trailing::Other,
            _,
        ) => false,
    }
}

/// Append `token` to `expr`, inserting `*` where the rule table asks for it.
pub fn join_operand(expr: &mut String, token: &str, next: Operand) {
    if implicit_multiply(classify(expr), next) {
        expr.push('*');
    }
    expr.push_str(token);
}

/// Byte range of the numeric run at the end of the expression, including an
/// exponent such as `2.5e-9` left by a chained result
pub fn trailing_number(expr: &str) -> Option<(usize, usize)> {
    TRAILING_NUMBER.find(expr).map(|m| (m.start(), m.end()))
}

/// Count of (open, close) parentheses
pub fn paren_counts(expr: &str) -> (usize, usize) {
    expr.chars().fold((0, 0), |(open, close), c| match c {
        '(' => (open + 1, close),
        ')' => (open, close + 1),
        _ => (open, close),
    })
}
