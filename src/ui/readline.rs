/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use crate::{
    session::Session,
    ui::{help_text, status_tags, variables_line, CalcDisplay, Message},
};

use rustyline::{error::ReadlineError, DefaultEditor};
use std::error::Error;

const PROMPT: &str = ">> ";

pub struct ReadlineCalcUI {
    editor: DefaultEditor,
    input: Option<String>,
    display: Vec<String>,
    error: Option<String>,
    banner: Option<String>,
}

/// Lines printed before each prompt, oldest history first
fn render(session: &Session) -> Vec<String> {
    let mut lines = session
        .history
        .iter()
        .map(|h| format!("  {} = {}", h.expression, h.result))
        .collect::<Vec<_>>();
    lines.push(format!("[{}] {}", status_tags(session).join(" "), variables_line(session)));
    lines.push(format!("  {}", session.expression));
    lines.push(format!("  = {}", session.result));
    lines
}

/// Add a line to the editor's recall list; false if it was skipped
fn remember(editor: &mut DefaultEditor, line: &str) -> bool {
    match editor.add_history_entry(line) {
        Ok(added) => added,
        Err(e) => {
            log::debug!("history entry not added: {e}");
            false
        }
    }
}

impl CalcDisplay for ReadlineCalcUI {
    fn init() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let editor = DefaultEditor::new()?;

        Ok(Self {
            input: None,
            error: None,
            banner: None,
            display: render(&Session::default()),
            editor,
        })
    }

    /// Wait on next Message for event loop
    fn next(&mut self) -> Option<Message> {
        loop {
            if let Some(banner) = self.banner.as_ref() {
                println!("{banner}");
            }
            if let Some(err) = self.error.as_ref() {
                println!("Error: {err}");
            } else {
                println!();
            }
            self.display.iter().for_each(|l| println!("{l}"));

            // retry a rejected line with its text already in the editor
            let readline = match self.input.take() {
                Some(retry) => self.editor.readline_with_initial(PROMPT, (retry.as_str(), "")),
                None => self.editor.readline(PROMPT),
            };

            match readline {
                Ok(line) => {
                    remember(&mut self.editor, &line);
                    return Some(Message::Input(line));
                }
                Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
                Err(ReadlineError::WindowResized) => {} // redraw
                Err(e) => {
                    self.set_error(Some(e.to_string()));
                    continue;
                }
            }
        }
        None
    }

    /// Push input around again
    fn push_input(&mut self, value: String) {
        self.input = if value.is_empty() { None } else { Some(value) };
    }

    /// Set/Clear error message
    fn set_error(&mut self, msg: Option<String>) {
        self.error = msg;
    }

    /// Display Dialog with text
    fn dialog(&mut self, msg: String) {
        println!("{msg}");
    }

    fn set_session(&mut self, session: &Session) {
        self.display = render(session);
        if session.error.is_some() {
            self.error = session.error.clone();
        }
    }

    fn set_banner(&mut self, banner: Option<String>) {
        self.banner = banner;
    }

    /// Show Help Text
    fn help(&mut self) {
        println!("{}", help_text());
    }

    /// Cleanup and quit
    fn quit(&mut self) {}
}
