use chrono::{DateTime, Local, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::Command;
use crate::api::{Motd, User};
use crate::auth::TokenClaims;
use crate::tui::components::{Banner, Menu};
use crate::tui::theme::{MUTED, PRIMARY, SECONDARY, SUCCESS, WARNING};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Refresh,
    SignOut,
}

/// Signed-in home screen
#[derive(Debug)]
pub struct DashboardScreen {
    claims: Option<TokenClaims>,
    user: Option<User>,
    motd: Option<Motd>,
    refreshed_at: Option<DateTime<Utc>>,
    menu: Menu<Choice>,
    pub(super) banner: Option<Banner>,
}

impl DashboardScreen {
    pub fn new(claims: Option<TokenClaims>) -> Self {
        Self {
            claims,
            user: None,
            motd: None,
            refreshed_at: None,
            menu: Menu::new(vec![("Refresh", Choice::Refresh), ("Sign out", Choice::SignOut)]),
            banner: None,
        }
    }

    pub fn set_user(&mut self, user: Option<User>, claims: Option<TokenClaims>) {
        if user.is_some() {
            self.user = user;
        }
        if claims.is_some() {
            self.claims = claims;
        }
        self.refreshed_at = Some(Utc::now());
    }

    pub fn set_motd(&mut self, motd: Motd) {
        self.motd = Some(motd);
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn motd(&self) -> Option<&Motd> {
        self.motd.as_ref()
    }

    fn display_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.display_name().to_string())
            .or_else(|| self.claims.as_ref()?.display_name().map(str::to_string))
            .unwrap_or_else(|| "there".to_string())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('r') {
            return Some(Command::RefreshSession);
        }
        match self.menu.handle_key(key)? {
            Choice::Refresh => Some(Command::RefreshSession),
            Choice::SignOut => Some(Command::SignOut),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let banner_height = self.banner.as_ref().map_or(0, Banner::height);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),             // Greeting
                Constraint::Length(5),             // Account cards
                Constraint::Min(5),                // Message of the day
                Constraint::Length(4),             // Menu
                Constraint::Length(banner_height), // Errors
            ])
            .split(area);

        let greeting = Paragraph::new(Line::from(vec![
            Span::raw("Hello, "),
            Span::styled(self.display_name(), Style::default().fg(PRIMARY).bold()),
        ]));
        frame.render_widget(greeting, chunks[0]);

        self.draw_account_cards(frame, chunks[1]);
        self.draw_motd(frame, chunks[2]);
        self.menu.render(frame, chunks[3], "Actions");
        if let Some(banner) = &self.banner {
            banner.render(frame, chunks[4]);
        }
    }

    fn draw_account_cards(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(area);

        let email = self
            .user
            .as_ref()
            .map(|u| u.email.clone())
            .or_else(|| self.claims.as_ref()?.email.clone())
            .unwrap_or_else(|| "-".to_string());

        let expires = self
            .claims
            .as_ref()
            .and_then(TokenClaims::expires_at)
            .map_or_else(
                || "never".to_string(),
                |at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            );

        let refreshed = self.refreshed_at.map_or_else(
            || "not yet".to_string(),
            |at| at.with_timezone(&Local).format("%H:%M:%S").to_string(),
        );

        let cards = [
            ("Email", email, SECONDARY),
            ("Session expires", expires, WARNING),
            ("Last refresh", refreshed, SUCCESS),
        ];

        for (i, (title, value, color)) in cards.iter().enumerate() {
            let block = Block::default()
                .title(*title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED));

            let text = Paragraph::new(value.as_str())
                .style(Style::default().fg(*color).bold())
                .alignment(Alignment::Center)
                .block(block);

            frame.render_widget(text, chunks[i]);
        }
    }

    fn draw_motd(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Message of the day")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED));

        let lines = match &self.motd {
            Some(motd) => {
                let mut lines = vec![Line::from(Span::styled(
                    format!("“{}”", motd.message),
                    Style::default().italic(),
                ))];
                if let Some(author) = &motd.author {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        format!("- {author}"),
                        Style::default().fg(MUTED),
                    )));
                }
                lines
            }
            None => vec![Line::from(Span::styled("…", Style::default().fg(MUTED)))],
        };

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_menu_commands() {
        let mut screen = DashboardScreen::new(None);

        assert!(matches!(
            screen.handle_key(key(KeyCode::Enter)),
            Some(Command::RefreshSession)
        ));
        screen.handle_key(key(KeyCode::Down));
        assert!(matches!(
            screen.handle_key(key(KeyCode::Enter)),
            Some(Command::SignOut)
        ));
        assert!(matches!(
            screen.handle_key(key(KeyCode::Char('r'))),
            Some(Command::RefreshSession)
        ));
    }

    #[test]
    fn test_display_name_prefers_user() {
        let claims = TokenClaims {
            email: Some("claims@example.com".into()),
            ..TokenClaims::default()
        };
        let mut screen = DashboardScreen::new(Some(claims));
        assert_eq!(screen.display_name(), "claims@example.com");

        screen.set_user(
            Some(User {
                id: Some("1".into()),
                email: "ada@example.com".into(),
                name: Some("Ada".into()),
            }),
            None,
        );
        assert_eq!(screen.display_name(), "Ada");
        assert!(screen.refreshed_at.is_some());
    }
}
