//! Reusable TUI components
//!
//! Text fields, a field-sequencing form, a selectable menu and a message
//! banner shared by the screens.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::theme::{ERROR, MUTED, PRIMARY, SUCCESS};

/// A single-line text input
#[derive(Debug, Clone)]
pub struct TextField {
    label: &'static str,
    value: String,
    masked: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
        }
    }

    /// Render the value as bullets
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Apply an editing key. Returns `true` if the key was consumed.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }

    fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border = if focused {
            Style::default().fg(PRIMARY)
        } else {
            Style::default().fg(MUTED)
        };
        let cursor = if focused { "▌" } else { "" };

        let paragraph = Paragraph::new(format!("{}{}", self.display_value(), cursor)).block(
            Block::default()
                .title(self.label)
                .borders(Borders::ALL)
                .border_style(border),
        );
        frame.render_widget(paragraph, area);
    }
}

/// What a form did with a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Key was handled inside the form
    Handled,
    /// Enter was pressed on the last field
    Submit,
    /// Esc was pressed
    Cancel,
    /// Key is not a form key
    Ignored,
}

/// An ordered set of text fields with one focused at a time
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<TextField>,
    focus: usize,
}

impl Form {
    pub fn new(fields: Vec<TextField>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focus_field(&mut self, index: usize) {
        if index < self.fields.len() {
            self.focus = index;
        }
    }

    pub fn next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len().max(1);
    }

    pub fn prev(&mut self) {
        let len = self.fields.len().max(1);
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn is_last(&self) -> bool {
        self.focus + 1 >= self.fields.len()
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", TextField::value)
    }

    /// Field sequencing: Tab/Down forward, BackTab/Up back, Enter advances
    /// or submits on the last field.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.next();
                FormAction::Handled
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.prev();
                FormAction::Handled
            }
            KeyCode::Enter if self.is_last() => FormAction::Submit,
            KeyCode::Enter => {
                self.next();
                FormAction::Handled
            }
            _ => {
                let consumed = self
                    .fields
                    .get_mut(self.focus)
                    .is_some_and(|field| field.input(key));
                if consumed {
                    FormAction::Handled
                } else {
                    FormAction::Ignored
                }
            }
        }
    }

    /// Height needed to render every field
    pub fn height(&self) -> u16 {
        self.fields.len() as u16 * 3
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3); self.fields.len()])
            .split(area);

        for (i, field) in self.fields.iter().enumerate() {
            if let Some(chunk) = chunks.get(i) {
                field.render(frame, *chunk, i == self.focus);
            }
        }
    }
}

/// A vertical list of choices
#[derive(Debug, Clone)]
pub struct Menu<T: Copy> {
    items: Vec<(&'static str, T)>,
    state: ListState,
}

impl<T: Copy> Menu<T> {
    pub fn new(items: Vec<(&'static str, T)>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self { items, state }
    }

    pub fn selected(&self) -> Option<T> {
        self.state
            .selected()
            .and_then(|i| self.items.get(i))
            .map(|(_, item)| *item)
    }

    pub fn up(&mut self) {
        let i = self.state.selected().unwrap_or(0);
        self.state.select(Some(i.saturating_sub(1)));
    }

    pub fn down(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().unwrap_or(0);
        self.state.select(Some((i + 1).min(len - 1)));
    }

    /// Navigation keys move the selection; Enter returns the selected item.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<T> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.up(),
            KeyCode::Down | KeyCode::Char('j') => self.down(),
            KeyCode::Home | KeyCode::Char('g') => self.state.select(Some(0)),
            KeyCode::End | KeyCode::Char('G') => {
                self.state.select(Some(self.items.len().saturating_sub(1)));
            }
            KeyCode::Enter => return self.selected(),
            _ => {}
        }
        None
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str) {
        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|(label, _)| ListItem::new(format!("  {label}")))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(title.to_string())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(MUTED)),
            )
            .highlight_style(Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD))
            .highlight_symbol("›");

        frame.render_stateful_widget(list, area, &mut self.state.clone());
    }
}

/// Severity of a banner message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

/// Inline message block shown under a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub tone: Tone,
    pub lines: Vec<String>,
}

impl Banner {
    pub fn error(lines: Vec<String>) -> Self {
        Self {
            tone: Tone::Error,
            lines,
        }
    }

    pub fn info(line: impl Into<String>) -> Self {
        Self {
            tone: Tone::Info,
            lines: vec![line.into()],
        }
    }

    pub fn success(line: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            lines: vec![line.into()],
        }
    }

    pub fn height(&self) -> u16 {
        self.lines.len() as u16 + 2
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let color = match self.tone {
            Tone::Info => PRIMARY,
            Tone::Success => SUCCESS,
            Tone::Error => ERROR,
        };

        let lines: Vec<Line> = self
            .lines
            .iter()
            .map(|line| Line::from(Span::styled(line.clone(), Style::default().fg(color))))
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

/// Key hint line rendered at the bottom of a screen
pub fn hints(pairs: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(MUTED)));
        }
        spans.push(Span::styled(key.to_string(), Style::default().fg(PRIMARY).bold()));
        spans.push(Span::styled(format!(" {action}"), Style::default().fg(MUTED)));
    }
    Line::from(spans)
}

/// Status dot with a label
pub fn status_indicator(label: &str, ok: bool) -> Span<'static> {
    let (symbol, color) = if ok {
        ("●", SUCCESS)
    } else {
        ("○", Color::DarkGray)
    };
    Span::styled(format!("{symbol} {label}"), Style::default().fg(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn form() -> Form {
        Form::new(vec![
            TextField::new("Email"),
            TextField::new("Password").masked(),
        ])
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut form = form();
        for c in "ab".chars() {
            assert_eq!(form.handle_key(key(KeyCode::Char(c))), FormAction::Handled);
        }
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Char('x')));
        form.handle_key(key(KeyCode::Backspace));
        form.handle_key(key(KeyCode::Char('y')));

        assert_eq!(form.value(0), "ab");
        assert_eq!(form.value(1), "y");
    }

    #[test]
    fn test_enter_advances_then_submits() {
        let mut form = form();

        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Handled);
        assert_eq!(form.focus(), 1);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Submit);
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = form();
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.focus(), 1);
        form.handle_key(key(KeyCode::Down));
        assert_eq!(form.focus(), 0);
    }

    #[test]
    fn test_control_chars_are_not_typed() {
        let mut form = form();
        let ctrl_f = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL);

        assert_eq!(form.handle_key(ctrl_f), FormAction::Ignored);
        assert_eq!(form.value(0), "");
    }

    #[test]
    fn test_unbound_keys_leave_fields_alone() {
        let mut form = form();
        form.handle_key(key(KeyCode::Char('a')));

        assert_eq!(form.handle_key(key(KeyCode::F(1))), FormAction::Ignored);
        assert_eq!(form.handle_key(key(KeyCode::Home)), FormAction::Ignored);
        assert_eq!(form.value(0), "a");
        assert_eq!(form.focus(), 0);
    }

    #[test]
    fn test_masked_display() {
        let field = TextField::new("Password").masked().with_value("hunter2");
        assert_eq!(field.display_value(), "•••••••");
    }

    #[test]
    fn test_menu_selection() {
        let mut menu = Menu::new(vec![("One", 1), ("Two", 2)]);

        assert_eq!(menu.handle_key(key(KeyCode::Enter)), Some(1));
        menu.handle_key(key(KeyCode::Down));
        menu.handle_key(key(KeyCode::Down));
        assert_eq!(menu.handle_key(key(KeyCode::Enter)), Some(2));
        menu.handle_key(key(KeyCode::Char('k')));
        assert_eq!(menu.selected(), Some(1));
    }
}
