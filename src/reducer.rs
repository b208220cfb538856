/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! The calculator input state machine: `(Session, Event) -> Session`.

use crate::{
    evaluator::Evaluator,
    format::{format_number, parse_number, DEFAULT_PRECISION},
    session::{
        AngleUnit, HistoryEntry, InputKind, Session, Variable, ERROR_SENTINEL, EVAL_ERROR,
    },
    tokens::{
        classify, is_operator, join_operand, paren_counts, trailing_number, BinaryOp, Constant,
        Function, Operand, PostfixOp, Trailing,
    },
};

/// What `Equals` leaves in the expression after a successful evaluation
#[derive(clap::ValueEnum, Default, Debug, Copy, Clone, strum_macros::Display, PartialEq, Eq)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum EqualsPolicy {
    /// Expression becomes the formatted result so operators continue from it
    #[default]
    Chain,
    /// Expression is emptied and the result stands alone
    Clear,
}

/// What `Clear` does to history (`ClearAll` always wipes it)
#[derive(clap::ValueEnum, Default, Debug, Copy, Clone, strum_macros::Display, PartialEq, Eq)]
#[clap(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ClearPolicy {
    #[default]
    KeepHistory,
    WipeHistory,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Settings {
    pub equals: EqualsPolicy,
    pub clear: ClearPolicy,
    /// Significant digits in a displayed result
    pub precision: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            equals: EqualsPolicy::default(),
            clear: ClearPolicy::default(),
            precision: DEFAULT_PRECISION,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Paren {
    Open,
    Close,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Event {
    /// A digit `0`-`9` or the decimal point
    Digit(char),
    Operator(BinaryOp),
    Function(Function),
    Constant(Constant),
    Postfix(PostfixOp),
    Parenthesis(Paren),
    ToggleSign,
    Backspace,
    Equals,
    Clear,
    ClearAll,
    ToggleAngleUnit,
    SetAngleUnit(AngleUnit),
    MemoryStore,
    MemoryRecall,
    MemoryClear,
    MemoryAdd,
    MemorySubtract,
    /// Insert the last result
    Answer,
    ToggleTheme,
    ToggleShift,
    ToggleAlpha,
    InitiateStore,
    InitiateRecall,
    VariableKey(Variable),
    ClearVariables,
}

impl Event {
    /// Keys that insert into the expression use up a pending SHIFT
    fn consumes_shift(&self) -> bool {
        matches!(
            self,
            Event::Digit(_)
                | Event::Operator(_)
                | Event::Function(_)
                | Event::Constant(_)
                | Event::Postfix(_)
                | Event::Parenthesis(_)
                | Event::MemoryRecall
                | Event::Answer
                | Event::VariableKey(_)
        )
    }
}

enum Return {
    Ok,
    Noop,
    Err(String),
}

pub struct Calculator<E: Evaluator> {
    evaluator: E,
    settings: Settings,
}

impl<E: Evaluator> Calculator<E> {
    pub fn new(evaluator: E, settings: Settings) -> Self {
        Self {
            evaluator,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Compute the session following `event`. Rejected input returns the
    /// session unchanged; evaluation failures are reported in `error`.
    pub fn transition(&self, session: &Session, event: &Event) -> Session {
        let mut next = session.clone();

        match self.apply(&mut next, event) {
            Return::Ok => {
                if !matches!(event, Event::Equals | Event::ToggleTheme) {
                    clear_error(&mut next);
                }
                if event.consumes_shift() {
                    next.modes.clear_shift();
                }
                log::debug!("{event:?}: {:?} = {:?}", next.expression, next.result);
                next
            }
            Return::Noop => {
                log::debug!("{event:?}: rejected");
                session.clone()
            }
            Return::Err(e) => {
                log::warn!("evaluation of {:?} failed: {e}", next.expression);
                next.expression.clear();
                next.result = ERROR_SENTINEL.to_string();
                next.error = Some(EVAL_ERROR.to_string());
                next.last_input = InputKind::None;
                next
            }
        }
    }

    fn apply(&self, s: &mut Session, event: &Event) -> Return {
        match event {
            Event::Digit(token) => digit(s, *token),
            Event::Operator(op) => operator(s, *op),
            Event::Function(f) => {
                insert_operand(s, &f.token(), Operand::Function);
                s.last_input = InputKind::Function;
                Return::Ok
            }
            Event::Constant(k) => {
                insert_operand(s, k.name(), Operand::Constant);
                s.last_input = InputKind::Constant;
                Return::Ok
            }
            Event::Postfix(op) => postfix(s, *op),
            Event::Parenthesis(paren) => parenthesis(s, *paren),
            Event::ToggleSign => toggle_sign(s),
            Event::Backspace => {
                s.expression.pop();
                s.result = "0".to_string();
                s.last_input = match s.expression.chars().last() {
                    None => InputKind::None,
                    Some(c) if is_operator(c) => InputKind::Operator,
                    Some(_) => InputKind::Digit,
                };
                Return::Ok
            }
            Event::Equals => self.equals(s),
            Event::Clear => {
                s.reset_input();
                if self.settings.clear == ClearPolicy::WipeHistory {
                    s.history.clear();
                }
                Return::Ok
            }
            Event::ClearAll => {
                s.reset_input();
                s.history.clear();
                Return::Ok
            }
            Event::ToggleAngleUnit => {
                s.angle_unit = s.angle_unit.next();
                Return::Ok
            }
            Event::SetAngleUnit(unit) => {
                s.angle_unit = *unit;
                Return::Ok
            }
            Event::MemoryStore => self.update_memory(s, |_, v| v),
            Event::MemoryAdd => self.update_memory(s, |m, v| m + v),
            Event::MemorySubtract => self.update_memory(s, |m, v| m - v),
            Event::MemoryRecall => {
                let text = format_number(s.memory, self.settings.precision);
                insert_operand(s, &text, Operand::Value);
                s.last_input = InputKind::Digit;
                Return::Ok
            }
            Event::MemoryClear => {
                s.memory = 0.0;
                Return::Ok
            }
            Event::Answer => match parse_number(&s.result) {
                Some(_) => {
                    let text = s.result.clone();
                    insert_operand(s, &text, Operand::Value);
                    s.last_input = InputKind::Digit;
                    Return::Ok
                }
                None => Return::Noop,
            },
            Event::ToggleTheme => {
                s.theme = s.theme.toggled();
                Return::Ok
            }
            Event::ToggleShift => {
                s.modes.toggle_shift();
                Return::Ok
            }
            Event::ToggleAlpha => {
                s.modes.toggle_alpha();
                Return::Ok
            }
            Event::InitiateStore => {
                s.modes.initiate_store();
                Return::Ok
            }
            Event::InitiateRecall => {
                s.modes.initiate_recall();
                Return::Ok
            }
            Event::VariableKey(var) => self.variable_key(s, *var),
            Event::ClearVariables => {
                s.variables.reset();
                Return::Ok
            }
        }
    }

    fn equals(&self, s: &mut Session) -> Return {
        if s.expression.is_empty() {
            return Return::Noop;
        }
        let value = match self
            .evaluator
            .evaluate(&s.expression, &s.variables, s.angle_unit)
        {
            Ok(v) => v,
            Err(e) => return Return::Err(e.to_string()),
        };
        let formatted = format_number(value, self.settings.precision);

        s.history.push(HistoryEntry {
            expression: s.expression.clone(),
            result: formatted.clone(),
        });
        s.expression = match self.settings.equals {
            EqualsPolicy::Chain => formatted.clone(),
            EqualsPolicy::Clear => String::new(),
        };
        s.result = formatted;
        s.error = None;
        s.last_input = InputKind::Equals;
        Return::Ok
    }

    /// The number memory and store operate on: the expression being typed,
    /// or the last result when nothing new has been typed.
    fn numeric_source(&self, s: &Session) -> Option<f64> {
        if !s.expression.is_empty() && s.last_input != InputKind::Equals {
            self.evaluator
                .evaluate(&s.expression, &s.variables, s.angle_unit)
                .ok()
        } else {
            parse_number(&s.result)
        }
    }

    fn update_memory<F: Fn(f64, f64) -> f64>(&self, s: &mut Session, f: F) -> Return {
        match self.numeric_source(s) {
            Some(v) => {
                s.memory = f(s.memory, v);
                Return::Ok
            }
            None => Return::Noop,
        }
    }

    fn variable_key(&self, s: &mut Session, var: Variable) -> Return {
        if s.modes.store_active() {
            let Some(value) = self.numeric_source(s) else {
                return Return::Noop;
            };
            s.variables.set(var, value);
            s.expression.clear();
            s.result = format_number(value, self.settings.precision);
            s.last_input = InputKind::None;
            s.modes.clear_all();
            Return::Ok
        } else if s.modes.recall_active() || s.modes.alpha_active() {
            insert_operand(s, var.name(), Operand::Variable);
            s.modes.clear_all();
            s.last_input = InputKind::Digit;
            Return::Ok
        } else {
            Return::Noop
        }
    }
}

fn clear_error(s: &mut Session) {
    if s.error.take().is_some() && s.result == ERROR_SENTINEL {
        s.result = "0".to_string();
    }
}

/// Insert an operand, replacing a finished or failed expression
fn insert_operand(s: &mut Session, token: &str, kind: Operand) {
    if s.starts_fresh() {
        s.expression.clear();
    }
    join_operand(&mut s.expression, token, kind);
}

fn digit(s: &mut Session, token: char) -> Return {
    if !(token.is_ascii_digit() || token == '.') {
        return Return::Noop;
    }

    if s.starts_fresh() {
        s.expression = if token == '.' {
            "0.".to_string()
        } else {
            token.to_string()
        };
    } else if s.expression == "0" && token != '.' {
        s.expression = token.to_string();
    } else if token == '.' {
        if let Some((start, end)) = trailing_number(&s.expression) {
            if s.expression[start..end].contains('.') {
                return Return::Noop;
            }
        }
        if classify(&s.expression) == Trailing::Digit {
            s.expression.push('.');
        } else {
            join_operand(&mut s.expression, "0.", Operand::Number);
        }
    } else {
        join_operand(&mut s.expression, &token.to_string(), Operand::Number);
    }

    s.last_input = InputKind::Digit;
    Return::Ok
}

fn operator(s: &mut Session, op: BinaryOp) -> Return {
    let symbol = op.symbol();
    if s.expression.is_empty() && op != BinaryOp::Sub {
        return Return::Noop;
    }

    let last = s.expression.chars().last();
    if s.last_input == InputKind::Operator {
        if let Some(prev) = last {
            // a second minus is kept as literal double negation
            if is_operator(prev) && !(prev == '-' && symbol == '-') {
                s.expression.pop();
                let rest = s.expression.chars().last();
                if matches!(rest, None | Some('(')) && op != BinaryOp::Sub {
                    return Return::Noop;
                }
                s.expression.push(symbol);
                return Return::Ok;
            }
        }
    }

    if last == Some('(') && op != BinaryOp::Sub {
        return Return::Noop;
    }

    s.expression.push(symbol);
    s.last_input = InputKind::Operator;
    Return::Ok
}

fn postfix(s: &mut Session, op: PostfixOp) -> Return {
    match classify(&s.expression) {
        Trailing::Digit
        | Trailing::CloseParen
        | Trailing::Variable
        | Trailing::Constant
        | Trailing::Postfix => {
            s.expression.push(op.symbol());
            s.last_input = InputKind::Operator;
            Return::Ok
        }
        _ => Return::Noop,
    }
}

fn parenthesis(s: &mut Session, paren: Paren) -> Return {
    match paren {
        Paren::Open => {
            if classify(&s.expression) == Trailing::Other {
                return Return::Noop;
            }
            join_operand(&mut s.expression, "(", Operand::OpenParen);
        }
        Paren::Close => {
            let (open, close) = paren_counts(&s.expression);
            let trailing = classify(&s.expression);
            if open <= close || matches!(trailing, Trailing::Operator | Trailing::OpenParen) {
                return Return::Noop;
            }
            s.expression.push(')');
        }
    }
    s.last_input = InputKind::Parenthesis;
    Return::Ok
}

fn toggle_sign(s: &mut Session) -> Return {
    if s.expression.is_empty() {
        s.expression = "-".to_string();
        s.last_input = InputKind::Operator;
        return Return::Ok;
    }
    if s.expression == "-" {
        s.expression.clear();
        s.last_input = InputKind::None;
        return Return::Ok;
    }

    let Some((start, _)) = trailing_number(&s.expression) else {
        return Return::Noop;
    };
    let before = &s.expression[..start];
    let unary_minus = before.ends_with('-')
        && before[..before.len() - 1]
            .chars()
            .last()
            .map_or(true, |c| is_operator(c) || c == '(');
    if unary_minus {
        s.expression.remove(start - 1);
    } else {
        s.expression.insert(start, '-');
    }
    Return::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::EvalError,
        evaluator::MevalEvaluator,
        session::{Theme, Variables, HISTORY_LIMIT},
    };
    use proptest::prelude::*;
    use std::cell::RefCell;

    fn calc() -> Calculator<MevalEvaluator> {
        Calculator::new(MevalEvaluator::new(), Settings::default())
    }

    fn run<E: Evaluator>(calc: &Calculator<E>, session: Session, events: &[Event]) -> Session {
        events
            .iter()
            .fold(session, |s, e| calc.transition(&s, e))
    }

    fn keys(text: &str) -> Vec<Event> {
        text.chars()
            .map(|c| match c {
                '0'..='9' | '.' => Event::Digit(c),
                '(' => Event::Parenthesis(Paren::Open),
                ')' => Event::Parenthesis(Paren::Close),
                '=' => Event::Equals,
                c => Event::Operator(BinaryOp::from_symbol(c).unwrap()),
            })
            .collect()
    }

    fn typed(text: &str) -> Session {
        run(&calc(), Session::default(), &keys(text))
    }

    /// Records every call and answers with a fixed value
    struct Recording {
        calls: RefCell<Vec<(String, f64, AngleUnit)>>,
        answer: Option<f64>,
    }

    impl Evaluator for Recording {
        fn evaluate(
            &self,
            expression: &str,
            variables: &Variables,
            angle: AngleUnit,
        ) -> Result<f64, EvalError> {
            self.calls
                .borrow_mut()
                .push((expression.to_string(), variables.get(Variable::A), angle));
            self.answer.ok_or(EvalError::NotANumber)
        }
    }

    #[test]
    fn test_equals_basic() {
        let s = typed("2+2=");
        assert_eq!(s.result, "4");
        assert_eq!(s.error, None);
        assert_eq!(s.last_input, InputKind::Equals);
        assert_eq!(s.history.last().map(|e| e.expression.as_str()), Some("2+2"));
    }

    #[test]
    fn test_equals_division_by_zero() {
        let s = typed("10/0=");
        assert_eq!(s.error.as_deref(), Some(EVAL_ERROR));
        assert_eq!(s.result, ERROR_SENTINEL);
        assert_eq!(s.expression, "");
        assert_eq!(s.last_input, InputKind::None);
        assert!(s.history.is_empty());
    }

    #[test]
    fn test_equals_empty_is_noop() {
        let s = Session::default();
        assert_eq!(calc().transition(&s, &Event::Equals), s);
    }

    #[test]
    fn test_equals_chain_policy() {
        let s = typed("2+3=");
        assert_eq!(s.expression, "5");
        let s = run(&calc(), s, &keys("*2="));
        assert_eq!(s.result, "10");
        assert_eq!(s.history.len(), 2);
    }

    #[test]
    fn test_equals_clear_policy() {
        let calc = Calculator::new(
            MevalEvaluator::new(),
            Settings {
                equals: EqualsPolicy::Clear,
                ..Settings::default()
            },
        );
        let s = run(&calc, Session::default(), &keys("2+3="));
        assert_eq!(s.expression, "");
        assert_eq!(s.result, "5");
        // nothing to chain from
        let s = run(&calc, s, &keys("*"));
        assert_eq!(s.expression, "");
    }

    #[test]
    fn test_digit_after_equals_starts_fresh() {
        let s = run(&calc(), typed("2+2="), &keys("7"));
        assert_eq!(s.expression, "7");
        let s = run(&calc(), typed("2+2="), &keys("."));
        assert_eq!(s.expression, "0.");
    }

    #[test]
    fn test_digit_after_error_starts_fresh() {
        let s = run(&calc(), typed("1/0="), &keys("3"));
        assert_eq!(s.expression, "3");
        assert_eq!(s.error, None);
        assert_eq!(s.result, "0");
    }

    #[test]
    fn test_leading_zero_replaced() {
        assert_eq!(typed("05").expression, "5");
        assert_eq!(typed("0.5").expression, "0.5");
        assert_eq!(typed("100").expression, "100");
    }

    #[test]
    fn test_double_decimal_rejected() {
        assert_eq!(typed("1.2.3").expression, "1.23");
        assert_eq!(typed("1.2+3.4").expression, "1.2+3.4");
        assert_eq!(typed("2+.").expression, "2+0.");
    }

    #[test]
    fn test_operator_rules() {
        assert_eq!(typed("+").expression, "");
        assert_eq!(typed("-").expression, "-");
        assert_eq!(typed("2+*").expression, "2*");
        assert_eq!(typed("2--").expression, "2--");
        assert_eq!(typed("2*-").expression, "2-");
        assert_eq!(typed("(*").expression, "(");
        assert_eq!(typed("(-").expression, "(-");
        assert_eq!(typed("(-*").expression, "(-");
        assert_eq!(typed("-+").expression, "-");
        assert_eq!(typed("(--").expression, "(--");
    }

    #[test]
    fn test_function_token() {
        let c = calc();
        let s = run(
            &c,
            Session::default(),
            &[Event::Digit('2'), Event::Function(Function::Sin)],
        );
        assert_eq!(s.expression, "2*sin(");
        assert_eq!(s.last_input, InputKind::Function);
        let s = run(&c, s, &keys("30)="));
        assert_eq!(s.result, "1");
    }

    #[test]
    fn test_sin_degrees() {
        let c = calc();
        let mut events = vec![Event::Function(Function::Sin)];
        events.extend(keys("90)="));
        let s = run(&c, Session::default(), &events);
        assert_eq!(s.angle_unit, AngleUnit::Deg);
        assert_eq!(s.result, "1");
    }

    #[test]
    fn test_parenthesis_rules() {
        assert_eq!(typed("2(").expression, "2*(");
        assert_eq!(typed("(2)(").expression, "(2)*(");
        assert_eq!(typed(")").expression, "");
        assert_eq!(typed("2)").expression, "2");
        assert_eq!(typed("(2+)").expression, "(2+");
        assert_eq!(typed("(()").expression, "((");
        assert_eq!(typed("(2))").expression, "(2)");
    }

    #[test]
    fn test_open_paren_after_function_name() {
        let c = calc();
        let s = run(
            &c,
            Session::default(),
            &[Event::Function(Function::Cos), Event::Backspace],
        );
        assert_eq!(s.expression, "cos");
        let s = c.transition(&s, &Event::Parenthesis(Paren::Open));
        assert_eq!(s.expression, "cos(");
    }

    #[test]
    fn test_toggle_sign() {
        let c = calc();
        let s = c.transition(&Session::default(), &Event::ToggleSign);
        assert_eq!(s.expression, "-");
        let s = c.transition(&s, &Event::ToggleSign);
        assert_eq!(s.expression, "");

        let s = c.transition(&typed("2+5"), &Event::ToggleSign);
        assert_eq!(s.expression, "2+-5");
        let s = c.transition(&s, &Event::ToggleSign);
        assert_eq!(s.expression, "2+5");

        let s = c.transition(&typed("12.5"), &Event::ToggleSign);
        assert_eq!(s.expression, "-12.5");
        let s = c.transition(&s, &Event::ToggleSign);
        assert_eq!(s.expression, "12.5");

        let s = c.transition(&typed("2-3"), &Event::ToggleSign);
        assert_eq!(s.expression, "2--3");

        let s = typed("(2+3)");
        assert_eq!(c.transition(&s, &Event::ToggleSign), s);
    }

    #[test]
    fn test_toggle_sign_exponent_result() {
        let c = calc();
        let s = typed("10^20=");
        assert_eq!(s.expression, "1e20");
        let s = c.transition(&s, &Event::ToggleSign);
        assert_eq!(s.expression, "-1e20");
        assert_eq!(c.transition(&s, &Event::Equals).result, "-1e20");
        assert_eq!(c.transition(&s, &Event::ToggleSign).expression, "1e20");

        let s = typed("2.5/1000000000=");
        assert_eq!(s.expression, "2.5e-9");
        let s = c.transition(&s, &Event::ToggleSign);
        assert_eq!(s.expression, "-2.5e-9");
        assert_eq!(c.transition(&s, &Event::ToggleSign).expression, "2.5e-9");
    }

    #[test]
    fn test_backspace() {
        let c = calc();
        let s = c.transition(&typed("12+"), &Event::Backspace);
        assert_eq!(s.expression, "12");
        assert_eq!(s.last_input, InputKind::Digit);
        let s = c.transition(&typed("12+3"), &Event::Backspace);
        assert_eq!(s.last_input, InputKind::Operator);
        let s = c.transition(&typed("7"), &Event::Backspace);
        assert_eq!(s.expression, "");
        assert_eq!(s.last_input, InputKind::None);
        let s = c.transition(&typed("2+2="), &Event::Backspace);
        assert_eq!(s.result, "0");
    }

    #[test]
    fn test_clear_preserves_settings() {
        let c = calc();
        let mut s = typed("9=");
        s = run(
            &c,
            s,
            &[
                Event::MemoryStore,
                Event::ToggleAngleUnit,
                Event::ToggleTheme,
                Event::InitiateStore,
                Event::VariableKey(Variable::B),
            ],
        );
        s = run(&c, s, &keys("1+"));
        let cleared = c.transition(&s, &Event::Clear);
        assert_eq!(cleared.expression, "");
        assert_eq!(cleared.result, "0");
        assert_eq!(cleared.last_input, InputKind::None);
        assert_eq!(cleared.memory, 9.0);
        assert_eq!(cleared.angle_unit, AngleUnit::Rad);
        assert_eq!(cleared.theme, Theme::Dark);
        assert_eq!(cleared.variables.get(Variable::B), 9.0);
        assert_eq!(cleared.history.len(), 1);
    }

    #[test]
    fn test_clear_history_policies() {
        let wipe = Calculator::new(
            MevalEvaluator::new(),
            Settings {
                clear: ClearPolicy::WipeHistory,
                ..Settings::default()
            },
        );
        let s = typed("1+1=");
        assert!(wipe.transition(&s, &Event::Clear).history.is_empty());
        assert_eq!(calc().transition(&s, &Event::Clear).history.len(), 1);
        assert!(calc().transition(&s, &Event::ClearAll).history.is_empty());
    }

    #[test]
    fn test_angle_unit_cycle() {
        let c = calc();
        for start in [AngleUnit::Deg, AngleUnit::Rad, AngleUnit::Grad] {
            let s = c.transition(&Session::default(), &Event::SetAngleUnit(start));
            let s = run(&c, s, &[Event::ToggleAngleUnit; 3]);
            assert_eq!(s.angle_unit, start);
        }
        let s = c.transition(&Session::default(), &Event::ToggleAngleUnit);
        assert_eq!(s.angle_unit, AngleUnit::Rad);
    }

    #[test]
    fn test_angle_unit_keeps_expression() {
        let s = typed("1+2");
        let next = calc().transition(&s, &Event::ToggleAngleUnit);
        assert_eq!(next.expression, "1+2");
    }

    #[test]
    fn test_memory() {
        let c = calc();
        let s = run(&c, typed("6*7"), &[Event::MemoryStore]);
        assert_eq!(s.memory, 42.0);
        assert_eq!(s.expression, "6*7");

        let s = run(&c, s, &[Event::Clear, Event::Digit('2'), Event::MemoryRecall]);
        assert_eq!(s.expression, "2*42");
        assert_eq!(s.last_input, InputKind::Digit);

        let s = run(&c, s, &[Event::MemoryAdd]);
        assert_eq!(s.memory, 126.0);
        let s = run(&c, s, &[Event::Equals, Event::MemorySubtract]);
        assert_eq!(s.memory, 42.0);

        let s = c.transition(&s, &Event::MemoryClear);
        assert_eq!(s.memory, 0.0);
    }

    #[test]
    fn test_memory_store_rejects_non_numeric() {
        let c = calc();
        let s = typed("1/0=");
        let stored = c.transition(&s, &Event::MemoryStore);
        assert_eq!(stored, s);
        let s = typed("2+");
        assert_eq!(c.transition(&s, &Event::MemoryStore), s);
    }

    #[test]
    fn test_store_variable() {
        let c = calc();
        let s = run(
            &c,
            typed("10"),
            &[Event::InitiateStore, Event::VariableKey(Variable::A)],
        );
        assert_eq!(s.variables.get(Variable::A), 10.0);
        assert_eq!(s.expression, "");
        assert_eq!(s.result, "10");
        assert!(!s.modes.any_active());
    }

    #[test]
    fn test_store_falls_back_to_result() {
        let c = Calculator::new(
            MevalEvaluator::new(),
            Settings {
                equals: EqualsPolicy::Clear,
                ..Settings::default()
            },
        );
        let s = run(&c, Session::default(), &keys("3*4="));
        let s = run(&c, s, &[Event::InitiateStore, Event::VariableKey(Variable::X)]);
        assert_eq!(s.variables.get(Variable::X), 12.0);
    }

    #[test]
    fn test_recall_variable() {
        let c = calc();
        let s = run(
            &c,
            typed("5"),
            &[Event::InitiateStore, Event::VariableKey(Variable::A)],
        );
        let s = run(
            &c,
            s,
            &[
                Event::Digit('3'),
                Event::InitiateRecall,
                Event::VariableKey(Variable::A),
            ],
        );
        assert_eq!(s.expression, "3*A");
        assert!(!s.modes.any_active());
        let s = run(
            &c,
            s,
            &[Event::ToggleAlpha, Event::VariableKey(Variable::A), Event::Equals],
        );
        assert_eq!(s.result, "75");
    }

    #[test]
    fn test_variable_key_without_mode_is_noop() {
        let s = typed("3");
        assert_eq!(calc().transition(&s, &Event::VariableKey(Variable::C)), s);
    }

    #[test]
    fn test_clear_variables() {
        let c = calc();
        let s = run(
            &c,
            typed("5"),
            &[
                Event::InitiateStore,
                Event::VariableKey(Variable::Y),
                Event::ClearVariables,
            ],
        );
        assert_eq!(s.variables.get(Variable::Y), 0.0);
    }

    #[test]
    fn test_theme_only_changes_theme() {
        let s = typed("1/0=");
        let next = calc().transition(&s, &Event::ToggleTheme);
        assert_eq!(next.theme, Theme::Dark);
        assert_eq!(next.error, s.error);
        assert_eq!(next.result, s.result);
    }

    #[test]
    fn test_shift_consumed_by_input() {
        let c = calc();
        let s = c.transition(&Session::default(), &Event::ToggleShift);
        assert!(s.modes.shift_active());
        let s = c.transition(&s, &Event::InitiateStore);
        assert!(s.modes.shift_active() && s.modes.store_active());
        let s = c.transition(&s, &Event::Digit('1'));
        assert!(!s.modes.shift_active());
    }

    #[test]
    fn test_constants_and_postfix() {
        let c = calc();
        let s = run(
            &c,
            typed("2"),
            &[Event::Constant(Constant::Pi)],
        );
        assert_eq!(s.expression, "2*pi");
        let s = run(
            &c,
            typed("5"),
            &[Event::Postfix(PostfixOp::Factorial), Event::Equals],
        );
        assert_eq!(s.result, "120");
        let s = run(&c, typed("+"), &[Event::Postfix(PostfixOp::Percent)]);
        assert_eq!(s.expression, "");
        let s = run(&c, typed("200*10"), &[Event::Postfix(PostfixOp::Percent), Event::Equals]);
        assert_eq!(s.result, "20");
    }

    #[test]
    fn test_answer() {
        let c = calc();
        let s = run(&c, typed("6/4="), &keys("1+"));
        let s = c.transition(&s, &Event::Answer);
        assert_eq!(s.expression, "1+1.5");
        let failed = typed("1/0=");
        assert_eq!(c.transition(&failed, &Event::Answer), failed);
    }

    #[test]
    fn test_evaluator_contract() {
        let rec = Recording {
            calls: RefCell::new(vec![]),
            answer: Some(7.0),
        };
        let c = Calculator::new(rec, Settings::default());
        let mut s = Session::new(AngleUnit::Grad, Theme::Light);
        s.variables.set(Variable::A, 2.0);
        let s = run(&c, s, &keys("3+4="));
        assert_eq!(s.result, "7");
        let calls = c.evaluator.calls.borrow();
        assert_eq!(calls.as_slice(), &[("3+4".to_string(), 2.0, AngleUnit::Grad)]);
    }

    #[test]
    fn test_evaluation_failure_from_evaluator() {
        let rec = Recording {
            calls: RefCell::new(vec![]),
            answer: None,
        };
        let c = Calculator::new(rec, Settings::default());
        let s = run(&c, Session::default(), &keys("3+4="));
        assert_eq!(s.result, ERROR_SENTINEL);
        assert!(s.error.is_some());
    }

    #[test]
    fn test_history_cap() {
        let c = calc();
        let s = (1..=12).fold(Session::default(), |s, i| {
            let s = c.transition(&s, &Event::Clear);
            run(&c, s, &keys(&format!("{i}+0=")))
        });
        assert_eq!(s.history.len(), HISTORY_LIMIT);
        assert_eq!(s.history.iter().next().map(|e| e.result.as_str()), Some("3"));
    }

    fn event_strategy() -> impl Strategy<Value = Event> {
        let var = prop::sample::select(Variable::ALL.to_vec());
        let op = prop::sample::select(vec![
            BinaryOp::Add,
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::Div,
            BinaryOp::Pow,
        ]);
        let func = prop::sample::select(Function::ALL.to_vec());
        prop_oneof![
            4 => prop::sample::select("0123456789.".chars().collect::<Vec<_>>()).prop_map(Event::Digit),
            2 => op.prop_map(Event::Operator),
            1 => func.prop_map(Event::Function),
            2 => prop::sample::select(vec![Paren::Open, Paren::Close]).prop_map(Event::Parenthesis),
            1 => var.prop_map(Event::VariableKey),
            2 => prop::sample::select(vec![
                Event::Equals,
                Event::Clear,
                Event::ClearAll,
                Event::Backspace,
                Event::ToggleSign,
                Event::ToggleAngleUnit,
                Event::MemoryStore,
                Event::MemoryRecall,
                Event::MemoryAdd,
                Event::Answer,
                Event::ToggleTheme,
                Event::Postfix(PostfixOp::Factorial),
                Event::Constant(Constant::Pi),
            ]),
            2 => prop::sample::select(vec![
                Event::ToggleShift,
                Event::ToggleAlpha,
                Event::InitiateStore,
                Event::InitiateRecall,
            ]),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_mode_flags_exclusive(events in prop::collection::vec(event_strategy(), 0..60)) {
            let c = calc();
            let mut s = Session::default();
            for e in &events {
                s = c.transition(&s, e);
                let active = [s.modes.alpha_active(), s.modes.store_active(), s.modes.recall_active()]
                    .iter()
                    .filter(|a| **a)
                    .count();
                prop_assert!(active <= 1);
                prop_assert!(s.history.len() <= HISTORY_LIMIT);
            }
        }

        #[test]
        fn prop_clear_preserves_persistent_state(events in prop::collection::vec(event_strategy(), 0..60)) {
            let c = calc();
            let s = run(&c, Session::default(), &events);
            let cleared = c.transition(&s, &Event::Clear);
            prop_assert_eq!(cleared.memory, s.memory);
            prop_assert_eq!(cleared.angle_unit, s.angle_unit);
            prop_assert_eq!(&cleared.variables, &s.variables);
            prop_assert_eq!(cleared.theme, s.theme);
            prop_assert_eq!(&cleared.expression, "");
            prop_assert_eq!(cleared.error, None);
        }

        #[test]
        fn prop_clear_then_digits_is_reproducible(
            events in prop::collection::vec(event_strategy(), 0..40),
            digits in "[1-9][0-9]{0,6}",
        ) {
            let c = calc();
            let typed: Vec<Event> = digits.chars().map(Event::Digit).collect();
            let dirty = run(&c, run(&c, Session::default(), &events), &[Event::Clear]);
            let fresh = run(&c, Session::default(), &[Event::Clear]);
            let dirty = run(&c, dirty, &typed);
            let fresh = run(&c, fresh, &typed);
            prop_assert_eq!(&dirty.expression, &fresh.expression);
            prop_assert_eq!(&dirty.result, &fresh.result);
            prop_assert_eq!(&dirty.error, &fresh.error);
        }

        #[test]
        fn prop_digits_after_equals_start_fresh(
            events in prop::collection::vec(event_strategy(), 0..40),
            digits in "[1-9][0-9]{0,6}",
        ) {
            let c = calc();
            let s = run(&c, Session::default(), &events);
            let s = c.transition(&s, &Event::Equals);
            prop_assume!(s.starts_fresh());
            let typed: Vec<Event> = digits.chars().map(Event::Digit).collect();
            let s = run(&c, s, &typed);
            prop_assert_eq!(s.expression, digits);
        }

        #[test]
        fn prop_history_is_fifo(values in prop::collection::vec(1u32..1000, 1..25)) {
            let c = calc();
            let mut s = Session::default();
            for v in &values {
                s = c.transition(&s, &Event::Clear);
                s = run(&c, s, &keys(&format!("{v}=")));
            }
            let expected: Vec<String> = values
                .iter()
                .skip(values.len().saturating_sub(HISTORY_LIMIT))
                .map(|v| v.to_string())
                .collect();
            let kept: Vec<String> = s.history.iter().map(|e| e.result.clone()).collect();
            prop_assert_eq!(kept, expected);
        }
    }
}
