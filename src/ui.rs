/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use crate::{
    format::{format_number, DEFAULT_PRECISION},
    keys::Key,
    session::{Session, Variable},
    tools,
};
use std::error::Error;

pub mod readline;
pub mod tui;

#[derive(clap::ValueEnum, Default, Debug, Copy, Clone, strum_macros::Display, PartialEq)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum Flavor {
    /// Simple line oriented interface
    Cli,
    /// Full screen Text User Interface
    #[default]
    Tui,
}

pub fn get_ui(flavor: Flavor) -> Result<Box<dyn CalcDisplay>, Box<dyn Error + Send + Sync>> {
    match flavor {
        Flavor::Cli => Ok(Box::new(readline::ReadlineCalcUI::init()?)),
        Flavor::Tui => Ok(Box::new(tui::TuiCalcUI::init()?)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A line of key labels, a `:` tool command, or a word like `quit`
    Input(String),
    /// A single key pressed directly
    Key(Key),
    Help,
    Quit,
}

pub trait CalcDisplay {
    /// Initialize Display driver
    fn init() -> Result<Self, Box<dyn Error + Send + Sync>>
    where
        Self: Sized;

    /// Wait on next Message for event loop
    fn next(&mut self) -> Option<Message>;

    /// Push input around again
    fn push_input(&mut self, value: String);

    /// Set/Clear error message
    fn set_error(&mut self, msg: Option<String>);

    /// Display Dialog with text
    fn dialog(&mut self, msg: String);

    fn set_session(&mut self, session: &Session);

    /// Set/Clear the advertising banner
    fn set_banner(&mut self, banner: Option<String>);

    /// Show Help Text
    fn help(&mut self);

    /// Cleanup and quit
    fn quit(&mut self);
}

/// Short tags for the angle unit and every active mode
pub fn status_tags(session: &Session) -> Vec<String> {
    let modes = &session.modes;
    let mut tags = vec![session.angle_unit.to_string()];
    tags.extend(
        [
            (modes.shift_active(), "SHIFT"),
            (modes.alpha_active(), "ALPHA"),
            (modes.store_active(), "STO"),
            (modes.recall_active(), "RCL"),
            (session.memory != 0.0, "M"),
        ]
        .into_iter()
        .filter(|(on, _)| *on)
        .map(|(_, tag)| tag.to_string()),
    );
    tags
}

/// Variables holding something other than zero, e.g. `A=7 X=0.5`
pub fn variables_line(session: &Session) -> String {
    Variable::ALL
        .into_iter()
        .map(|v| (v, session.variables.get(v)))
        .filter(|(_, value)| *value != 0.0)
        .map(|(v, value)| format!("{v}={}", format_number(value, DEFAULT_PRECISION)))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn help_text() -> String {
    format!(
        "\
Type key labels and press Enter, e.g. `2+3=` or `sin(30)=`.

Digits and operators   0-9 .  + - * / ^  ( )  ! %  =
Functions              sin cos tan  log ln  sqrt abs
Constants              pi e
Editing                del  AC  +/-  ans
Modes                  shift  alpha  drg  theme
Memory                 ms mr mc  M+ M-
Variables              A B C D X Y   sto A stores, rcl A recalls
                       clrv resets all variables

With SHIFT: sin cos tan give asin acos atan, ln gives exp,
sqrt gives cbrt, AC clears history too, M+ subtracts.

Tools
{}

quit or q to exit",
        tools::help_text()
    )
}
