/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use std::collections::{BTreeMap, VecDeque};

/// Maximum number of evaluated expressions kept in history
pub const HISTORY_LIMIT: usize = 10;

/// Shown in place of a result when evaluation fails
pub const ERROR_SENTINEL: &str = "Error";

/// Generic marker stored in `Session::error` when evaluation fails
pub const EVAL_ERROR: &str = "Math Error";

#[derive(clap::ValueEnum, Default, Debug, Copy, Clone, strum_macros::Display, PartialEq, Eq)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AngleUnit {
    #[default]
    Deg,
    Rad,
    Grad,
}

impl AngleUnit {
    /// deg -> rad -> grad -> deg
    pub fn next(self) -> Self {
        match self {
            AngleUnit::Deg => AngleUnit::Rad,
            AngleUnit::Rad => AngleUnit::Grad,
            AngleUnit::Grad => AngleUnit::Deg,
        }
    }

    /// Multiplier taking an angle in this unit to radians
    pub fn to_radians(self) -> f64 {
        match self {
            AngleUnit::Deg => std::f64::consts::PI / 180.0,
            AngleUnit::Rad => 1.0,
            AngleUnit::Grad => std::f64::consts::PI / 200.0,
        }
    }
}

#[derive(clap::ValueEnum, Default, Debug, Copy, Clone, strum_macros::Display, PartialEq, Eq)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Kind of the most recent accepted input; drives whether the next operand
/// starts a fresh expression or extends the current one.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputKind {
    #[default]
    None,
    Digit,
    Operator,
    Function,
    Parenthesis,
    Constant,
    Equals,
}

/// SHIFT is independent; at most one of ALPHA, STORE and RECALL is active.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModeFlags {
    shift: bool,
    alpha: bool,
    store: bool,
    recall: bool,
}

impl ModeFlags {
    pub fn shift_active(&self) -> bool {
        self.shift
    }

    pub fn alpha_active(&self) -> bool {
        self.alpha
    }

    pub fn store_active(&self) -> bool {
        self.store
    }

    pub fn recall_active(&self) -> bool {
        self.recall
    }

    pub fn toggle_shift(&mut self) {
        self.shift = !self.shift;
    }

    pub fn clear_shift(&mut self) {
        self.shift = false;
    }

    pub fn toggle_alpha(&mut self) {
        let alpha = !self.alpha;
        self.clear_exclusive();
        self.alpha = alpha;
    }

    pub fn initiate_store(&mut self) {
        self.clear_exclusive();
        self.store = true;
    }

    pub fn initiate_recall(&mut self) {
        self.clear_exclusive();
        self.recall = true;
    }

    pub fn clear_exclusive(&mut self) {
        self.alpha = false;
        self.store = false;
        self.recall = false;
    }

    pub fn clear_all(&mut self) {
        *self = ModeFlags::default();
    }

    pub fn any_active(&self) -> bool {
        self.shift || self.alpha || self.store || self.recall
    }
}

#[derive(Debug, Copy, Clone, strum_macros::Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    A,
    B,
    C,
    D,
    X,
    Y,
}

impl Variable {
    pub const ALL: [Variable; 6] = [
        Variable::A,
        Variable::B,
        Variable::C,
        Variable::D,
        Variable::X,
        Variable::Y,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variable::A => "A",
            Variable::B => "B",
            Variable::C => "C",
            Variable::D => "D",
            Variable::X => "X",
            Variable::Y => "Y",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }
}

/// Fixed set of named slots, all present and zero initially
#[derive(Debug, Clone, PartialEq)]
pub struct Variables {
    slots: BTreeMap<Variable, f64>,
}

impl Default for Variables {
    fn default() -> Self {
        Self {
            slots: Variable::ALL.into_iter().map(|v| (v, 0.0)).collect(),
        }
    }
}

impl Variables {
    pub fn get(&self, var: Variable) -> f64 {
        self.slots.get(&var).copied().unwrap_or_default()
    }

    pub fn set(&mut self, var: Variable, value: f64) {
        self.slots.insert(var, value);
    }

    pub fn reset(&mut self) {
        self.slots.values_mut().for_each(|v| *v = 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.slots.iter().map(|(k, v)| (*k, *v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
}

/// Evaluated expressions, oldest first, bounded by `HISTORY_LIMIT`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == HISTORY_LIMIT {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }
}

/// All calculator state. Front ends only read it; every change goes through
/// `Calculator::transition`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub expression: String,
    pub result: String,
    pub error: Option<String>,
    pub angle_unit: AngleUnit,
    pub memory: f64,
    pub variables: Variables,
    pub history: History,
    pub modes: ModeFlags,
    pub last_input: InputKind,
    pub theme: Theme,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            expression: String::new(),
            result: "0".to_string(),
            error: None,
            angle_unit: AngleUnit::default(),
            memory: 0.0,
            variables: Variables::default(),
            history: History::default(),
            modes: ModeFlags::default(),
            last_input: InputKind::None,
            theme: Theme::default(),
        }
    }
}

impl Session {
    pub fn new(angle_unit: AngleUnit, theme: Theme) -> Self {
        Self {
            angle_unit,
            theme,
            ..Self::default()
        }
    }

    /// Whether the next operand should replace the expression rather than extend it
    pub fn starts_fresh(&self) -> bool {
        self.last_input == InputKind::Equals || self.error.is_some()
    }

    /// Reset the transient input fields; persistent settings survive.
    pub fn reset_input(&mut self) {
        self.expression.clear();
        self.result = "0".to_string();
        self.error = None;
        self.last_input = InputKind::None;
        self.modes.clear_all();
    }
}
