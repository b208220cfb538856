/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use crate::{
    keys::Key,
    session::{Session, Theme},
    ui::{help_text, status_tags, variables_line, CalcDisplay, Message},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::{error::Error, io::Stdout};

#[derive(Debug, Clone, Default)]
struct CalcInfo {
    session: Session,
    error: Option<String>,
    banner: Option<String>,
    input: String,
    dialog: Option<String>,
    help_popup: bool,
    // location of scroll in help text
    help_scroll: u16,
    // Maximum scroll value
    help_max_scroll: u16,
    // Height of help popup
    help_height: u16,
}

pub(crate) struct TuiCalcUI {
    info: CalcInfo,
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

fn theme_style(theme: Theme) -> Style {
    match theme {
        Theme::Light => Style::default().fg(Color::Black).bg(Color::White),
        Theme::Dark => Style::default().fg(Color::White).bg(Color::Black),
    }
}

/// helper function to create a centered rectangle using up certain percentage of the available rectangle `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn ui(info: &mut CalcInfo, f: &mut Frame) {
    let session = &info.session;
    let style = theme_style(session.theme);
    let banner_height = u16::from(info.banner.is_some());

    f.render_widget(Block::default().style(style), f.area());

    let chunks = Layout::default()
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(banner_height),
        ])
        .split(f.area());

    let half = chunks[0].width / 2;
    let rows = session
        .history
        .iter()
        .rev()
        .take(chunks[0].height as usize)
        .rev()
        .map(|h| {
            Row::new(vec![
                Cell::from(Line::from(h.expression.as_str()).alignment(Alignment::Right)),
                Cell::from(Line::from(format!("= {}", h.result))),
            ])
        })
        .collect::<Vec<_>>();
    let history = Table::new(rows, [Constraint::Length(half), Constraint::Min(1)])
        .block(Block::default().borders(Borders::NONE))
        .column_spacing(1);
    f.render_widget(history, chunks[0]);

    let mut status = vec![
        Span::styled(
            format!("{:24}", status_tags(session).join(" ")),
            Modifier::BOLD,
        ),
        Span::raw(format!("{} ", variables_line(session))),
    ];
    if let Some(err) = info.error.as_ref().or(session.error.as_ref()) {
        status.push(Span::styled(err.clone(), Style::default().fg(Color::Red)));
    }
    f.render_widget(Paragraph::new(Line::from(status)), chunks[1]);

    f.render_widget(
        Paragraph::new(session.expression.as_str()).alignment(Alignment::Right),
        chunks[2],
    );
    f.render_widget(
        Paragraph::new(Span::styled(session.result.as_str(), Modifier::BOLD))
            .alignment(Alignment::Right),
        chunks[3],
    );
    f.render_widget(Paragraph::new(info.input.as_str()), chunks[4]);
    if let Some(banner) = info.banner.as_ref() {
        f.render_widget(
            Paragraph::new(banner.as_str())
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::REVERSED)),
            chunks[5],
        );
    }

    if info.help_popup {
        let block = Block::default().title("Help").borders(Borders::ALL).style(style);
        let area = centered_rect(80, 80, f.area());
        let inner = block.inner(area);
        let text = help_text();
        info.help_height = inner.height;
        info.help_max_scroll = text
            .lines()
            .count()
            .checked_sub(inner.height.into())
            .unwrap_or_default() as u16;
        let p = Paragraph::new(text).scroll((info.help_scroll, 0));
        f.render_widget(Clear, area);
        f.render_widget(block, area);
        f.render_widget(p, inner);
    } else if let Some(msg) = info.dialog.as_ref() {
        let block = Block::default().borders(Borders::ALL).style(style);
        let area = centered_rect(60, 50, f.area());
        let inner = block.inner(area);
        f.render_widget(Clear, area);
        f.render_widget(block, area);
        f.render_widget(Paragraph::new(msg.as_str()), inner);
    } else {
        f.set_cursor_position(Position::new(
            chunks[4].x + info.input.chars().count() as u16,
            chunks[4].y,
        ));
    }
}

/// Keys bound to control characters
fn hotkey(c: char) -> Option<Message> {
    let msg = match c {
        'q' => Message::Quit,
        'h' => Message::Help,
        'l' => Message::Key(Key::AllClear),
        's' => Message::Key(Key::Shift),
        'a' => Message::Key(Key::Alpha),
        'd' => Message::Key(Key::Drg),
        't' => Message::Key(Key::Theme),
        _ => return None,
    };
    Some(msg)
}

impl TuiCalcUI {
    // These match key bindings for less(1)
    fn help_key(&mut self, code: KeyCode) {
        let info = &mut self.info;
        match code {
            KeyCode::Esc | KeyCode::Char('q') => info.help_popup = false,
            KeyCode::Home | KeyCode::Char('g') => info.help_scroll = 0,
            KeyCode::Down | KeyCode::Enter | KeyCode::Char('j') => {
                info.help_scroll = std::cmp::min(info.help_scroll + 1, info.help_max_scroll)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                info.help_scroll = info.help_scroll.saturating_sub(1)
            }
            KeyCode::PageDown | KeyCode::Char(' ') | KeyCode::Char('f') => {
                info.help_scroll = std::cmp::min(
                    info.help_scroll + info.help_height,
                    info.help_max_scroll,
                )
            }
            KeyCode::PageUp | KeyCode::Char('b') => {
                info.help_scroll = info.help_scroll.saturating_sub(info.help_height)
            }
            KeyCode::End | KeyCode::Char('G') => info.help_scroll = info.help_max_scroll,
            _ => {}
        }
    }
}

impl CalcDisplay for TuiCalcUI {
    fn init() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let stdout = std::io::stdout();

        enable_raw_mode()?;
        execute!(&stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            info: CalcInfo::default(),
            terminal,
        })
    }

    /// Cleanup and quit
    fn quit(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }

    /// Wait on next Message for event loop
    fn next(&mut self) -> Option<Message> {
        loop {
            if let Err(e) = self.terminal.draw(|f| ui(&mut self.info, f)) {
                log::error!("draw failed: {e}");
                break;
            }

            match event::read() {
                Err(e) => {
                    log::error!("terminal read failed: {e}");
                    break;
                }
                Ok(Event::Key(k)) => {
                    if self.info.help_popup {
                        self.help_key(k.code);
                        continue;
                    }
                    if self.info.dialog.take().is_some() {
                        continue;
                    }
                    match k.code {
                        KeyCode::Char(c) if k.modifiers.contains(KeyModifiers::CONTROL) => {
                            match hotkey(c) {
                                Some(msg) => return Some(msg),
                                None => self.info.error = Some(format!("Unknown hotkey: ^{c}")),
                            }
                        }
                        KeyCode::Char(c) => self.info.input.push(c),
                        KeyCode::Enter if self.info.input.trim().is_empty() => {
                            self.info.input.clear();
                            return Some(Message::Key(Key::Equals));
                        }
                        KeyCode::Enter => {
                            let line = std::mem::take(&mut self.info.input);
                            return Some(Message::Input(line));
                        }
                        KeyCode::Backspace if self.info.input.is_empty() => {
                            return Some(Message::Key(Key::Delete))
                        }
                        KeyCode::Backspace => {
                            let _ = self.info.input.pop();
                        }
                        KeyCode::Esc => return Some(Message::Key(Key::AllClear)),
                        _ => {}
                    }
                }
                Ok(Event::Paste(val)) => self.info.input.push_str(&val),
                Ok(Event::Resize(_, _)) => {}
                Ok(e) => log::debug!("ignoring {e:?}"),
            }
        }
        None
    }

    /// Push input around again
    fn push_input(&mut self, value: String) {
        self.info.input = value;
    }

    /// Set/Clear error message
    fn set_error(&mut self, msg: Option<String>) {
        self.info.error = msg;
    }

    /// Display Dialog with text
    fn dialog(&mut self, msg: String) {
        self.info.dialog = Some(msg);
    }

    fn set_session(&mut self, session: &Session) {
        self.info.session = session.clone();
    }

    fn set_banner(&mut self, banner: Option<String>) {
        self.info.banner = banner;
    }

    /// Show Help Text
    fn help(&mut self) {
        self.info.help_popup = true;
        self.info.help_scroll = 0;
    }
}
