/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Expression evaluation backed by meval.

use crate::{
    error::EvalError,
    session::{AngleUnit, Variables},
};
use meval::{Context, Expr};

/// Evaluates expression text against a variable scope and angle unit.
pub trait Evaluator {
    fn evaluate(
        &self,
        expression: &str,
        variables: &Variables,
        angle: AngleUnit,
    ) -> Result<f64, EvalError>;
}

/// Largest n for which n! fits in an f64
const MAX_FACTORIAL: f64 = 170.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct MevalEvaluator;

impl MevalEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn context(variables: &Variables, angle: AngleUnit) -> Context<'static> {
        let k = angle.to_radians();
        let mut ctx = Context::new();
        ctx.func("sin", move |x: f64| (x * k).sin())
            .func("cos", move |x: f64| (x * k).cos())
            .func("tan", move |x: f64| (x * k).tan())
            .func("asin", move |x: f64| x.asin() / k)
            .func("acos", move |x: f64| x.acos() / k)
            .func("atan", move |x: f64| x.atan() / k)
            .func("log", f64::ln)
            .func("log10", f64::log10)
            .func("cbrt", f64::cbrt)
            .func("fact", factorial);
        for (var, value) in variables.iter() {
            ctx.var(var.name(), value);
        }
        ctx
    }
}

impl Evaluator for MevalEvaluator {
    fn evaluate(
        &self,
        expression: &str,
        variables: &Variables,
        angle: AngleUnit,
    ) -> Result<f64, EvalError> {
        let text = rewrite_postfix(&normalize(expression));
        log::trace!("evaluating {text:?} ({angle})");
        let expr: Expr = text.parse()?;
        let value = expr.eval_with_context(Self::context(variables, angle))?;

        if value.is_nan() {
            Err(EvalError::NotANumber)
        } else if value.is_infinite() {
            Err(EvalError::Infinite)
        } else {
            Ok(value)
        }
    }
}

fn factorial(x: f64) -> f64 {
    if x < 0.0 || x.fract() != 0.0 || x > MAX_FACTORIAL {
        return f64::NAN;
    }
    (2..=x as u32).fold(1.0, |acc, n| acc * n as f64)
}

/// Map display symbols onto the ASCII operators meval understands
fn normalize(expression: &str) -> String {
    expression
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '×' => "*".to_string(),
            '÷' => "/".to_string(),
            '−' => "-".to_string(),
            'π' => "pi".to_string(),
            c => c.to_string(),
        })
        .collect()
}

fn starts_operand(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '(' || c == '_'
}

/// Start of the operand ending at the end of `out`
fn operand_start(out: &str) -> Option<usize> {
    let bytes = out.as_bytes();
    let mut start = bytes.len();
    if bytes.last() == Some(&b')') {
        let mut depth = 0usize;
        for (i, b) in bytes.iter().enumerate().rev() {
            match b {
                b')' => depth += 1,
                b'(' => {
                    depth -= 1;
                    if depth == 0 {
                        start = i;
                        break;
                    }
                }
                _ => {}
            }
        }
        if depth != 0 {
            return None;
        }
    }
    // function name before a group, or a plain number/identifier
    while start > 0 {
        let b = bytes[start - 1];
        if b.is_ascii_alphanumeric() || b == b'.' || b == b'_' {
            start -= 1;
        } else {
            break;
        }
    }
    (start < bytes.len()).then_some(start)
}

/// Rewrite factorial `x!` as `fact(x)` and postfix percent `x%` as `(x/100)`.
/// A `%` followed by another operand is left alone as the remainder operator.
fn rewrite_postfix(expression: &str) -> String {
    let chars: Vec<char> = expression.chars().collect();
    let mut out = String::with_capacity(expression.len());

    for (i, &c) in chars.iter().enumerate() {
        let postfix = match c {
            '!' => true,
            '%' => !chars.get(i + 1).is_some_and(|&n| starts_operand(n)),
            _ => false,
        };
        if !postfix {
            out.push(c);
            continue;
        }
        match operand_start(&out) {
            Some(start) => {
                let operand = out.split_off(start);
                if c == '!' {
                    out.push_str(&format!("fact({operand})"));
                } else {
                    out.push_str(&format!("({operand}/100)"));
                }
            }
            // leave it for the parser to reject
            None => out.push(c),
        }
    }
    out
}
