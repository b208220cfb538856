/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! The keypad: key labels, and what each key does under the current modes.

use crate::{
    reducer::{Event, Paren},
    session::{ModeFlags, Variable},
    tokens::{BinaryOp, Constant, Function, PostfixOp},
};
use regex::Regex;
use std::sync::LazyLock;

static KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(M\+|M-|\+/-|[0-9.]|[-+*/^×÷−]|[()!%=]|π|[A-Za-z][A-Za-z0-9]*\(?)").unwrap()
});

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Operator(BinaryOp),
    Postfix(PostfixOp),
    Open,
    Close,
    Sin,
    Cos,
    Tan,
    /// Common logarithm
    Log,
    /// Natural logarithm
    Ln,
    Sqrt,
    Abs,
    Pi,
    E,
    Equals,
    AllClear,
    Delete,
    Sign,
    Drg,
    Shift,
    Alpha,
    Sto,
    Rcl,
    MemStore,
    MemRecall,
    MemClear,
    MemAdd,
    MemSub,
    Ans,
    Theme,
    ClearVars,
    Letter(Variable),
}

impl Key {
    /// Function keys accept their label with or without the opening
    /// parenthesis: `sin(` and `sin` are the same key.
    pub fn parse(word: &str) -> Option<Self> {
        let mut chars = word.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_digit() || c == '.' {
                return Some(Key::Digit(c));
            }
            if let Some(op) = BinaryOp::from_symbol(c) {
                return Some(Key::Operator(op));
            }
        }
        if let Some(var) = Variable::from_name(word) {
            return Some(Key::Letter(var));
        }

        let key = match word.trim_end_matches('(').to_ascii_lowercase().as_str() {
            "" if word == "(" => Key::Open,
            ")" => Key::Close,
            "!" => Key::Postfix(PostfixOp::Factorial),
            "%" => Key::Postfix(PostfixOp::Percent),
            "=" => Key::Equals,
            "sin" => Key::Sin,
            "cos" => Key::Cos,
            "tan" => Key::Tan,
            "log" | "log10" => Key::Log,
            "ln" => Key::Ln,
            "sqrt" | "√" => Key::Sqrt,
            "abs" => Key::Abs,
            "pi" | "π" => Key::Pi,
            "e" => Key::E,
            "ac" => Key::AllClear,
            "del" => Key::Delete,
            "+/-" => Key::Sign,
            "drg" => Key::Drg,
            "shift" => Key::Shift,
            "alpha" => Key::Alpha,
            "sto" => Key::Sto,
            "rcl" => Key::Rcl,
            "ms" => Key::MemStore,
            "mr" => Key::MemRecall,
            "mc" => Key::MemClear,
            "m+" => Key::MemAdd,
            "m-" => Key::MemSub,
            "ans" => Key::Ans,
            "theme" => Key::Theme,
            "clrv" => Key::ClearVars,
            _ => return None,
        };
        Some(key)
    }

    /// The event this key produces given the active modes. SHIFT selects the
    /// inverse or alternate function printed above the key.
    pub fn event(self, modes: &ModeFlags) -> Event {
        let shift = modes.shift_active();
        match self {
            Key::Digit(c) => Event::Digit(c),
            Key::Operator(op) => Event::Operator(op),
            Key::Postfix(op) => Event::Postfix(op),
            Key::Open => Event::Parenthesis(Paren::Open),
            Key::Close => Event::Parenthesis(Paren::Close),
            Key::Sin if shift => Event::Function(Function::Asin),
            Key::Sin => Event::Function(Function::Sin),
            Key::Cos if shift => Event::Function(Function::Acos),
            Key::Cos => Event::Function(Function::Cos),
            Key::Tan if shift => Event::Function(Function::Atan),
            Key::Tan => Event::Function(Function::Tan),
            Key::Log => Event::Function(Function::Log10),
            Key::Ln if shift => Event::Function(Function::Exp),
            Key::Ln => Event::Function(Function::Log),
            Key::Sqrt if shift => Event::Function(Function::Cbrt),
            Key::Sqrt => Event::Function(Function::Sqrt),
            Key::Abs => Event::Function(Function::Abs),
            Key::Pi => Event::Constant(Constant::Pi),
            Key::E => Event::Constant(Constant::E),
            Key::Equals => Event::Equals,
            Key::AllClear if shift => Event::ClearAll,
            Key::AllClear => Event::Clear,
            Key::Delete => Event::Backspace,
            Key::Sign => Event::ToggleSign,
            Key::Drg => Event::ToggleAngleUnit,
            Key::Shift => Event::ToggleShift,
            Key::Alpha => Event::ToggleAlpha,
            Key::Sto => Event::InitiateStore,
            Key::Rcl => Event::InitiateRecall,
            Key::MemStore => Event::MemoryStore,
            Key::MemRecall => Event::MemoryRecall,
            Key::MemClear => Event::MemoryClear,
            Key::MemAdd if shift => Event::MemorySubtract,
            Key::MemAdd => Event::MemoryAdd,
            Key::MemSub => Event::MemorySubtract,
            Key::Ans => Event::Answer,
            Key::Theme => Event::ToggleTheme,
            Key::ClearVars => Event::ClearVariables,
            Key::Letter(var) => Event::VariableKey(var),
        }
    }
}

/// Split a line of key labels such as `sin(90)=` or `1 0 STO A` into keys.
pub fn parse_keys(line: &str) -> Result<Vec<Key>, String> {
    let mut keys = vec![];
    let mut rest = line;

    while !rest.trim().is_empty() {
        let caps = KEY
            .captures(rest)
            .ok_or_else(|| format!("Unknown key at: {}", rest.trim()))?;
        let word = &caps[1];
        let key = Key::parse(word).ok_or_else(|| format!("Unknown key: {word}"))?;
        keys.push(key);
        rest = &rest[caps[0].len()..];
    }
    Ok(keys)
}
