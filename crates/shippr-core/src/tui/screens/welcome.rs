use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use super::Command;
use crate::router::{RouteEntry, RouteName};
use crate::tui::components::{Banner, Menu};
use crate::tui::theme::{MUTED, PRIMARY};
use crate::tui::ui::centered_box;

const LOGO: [&str; 5] = [
    r"     _     _                   ",
    r" ___| |__ (_)_ __  _ __  _ __ ",
    r"/ __| '_ \| | '_ \| '_ \| '__|",
    r"\__ \ | | | | |_) | |_) | |   ",
    r"|___/_| |_|_| .__/| .__/|_|   ",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Login,
    CreateAccount,
    ForgotPassword,
    Quit,
}

/// Landing menu for signed-out users
#[derive(Debug)]
pub struct WelcomeScreen {
    menu: Menu<Choice>,
    pub(super) banner: Option<Banner>,
}

impl WelcomeScreen {
    pub fn new() -> Self {
        Self {
            menu: Menu::new(vec![
                ("Log in", Choice::Login),
                ("Create account", Choice::CreateAccount),
                ("Forgot password", Choice::ForgotPassword),
                ("Quit", Choice::Quit),
            ]),
            banner: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        let command = match self.menu.handle_key(key)? {
            Choice::Login => Command::Push(RouteEntry::new(RouteName::Login)),
            Choice::CreateAccount => Command::Push(RouteEntry::new(RouteName::CreateAccount)),
            Choice::ForgotPassword => Command::Push(RouteEntry::new(RouteName::ForgotPassword)),
            Choice::Quit => Command::Quit,
        };
        Some(command)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let banner_height = self.banner.as_ref().map_or(0, Banner::height);
        let area = centered_box(44, LOGO.len() as u16 + 10 + banner_height, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(LOGO.len() as u16),
                Constraint::Length(2),
                Constraint::Length(6),
                Constraint::Length(banner_height),
            ])
            .split(area);

        let logo: Vec<Line> = LOGO.iter().map(|l| Line::from(*l)).collect();
        frame.render_widget(
            Paragraph::new(logo)
                .style(Style::default().fg(PRIMARY).bold())
                .alignment(Alignment::Center),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new("Ship faster from your terminal")
                .style(Style::default().fg(MUTED).italic())
                .alignment(Alignment::Center),
            chunks[1],
        );
        self.menu.render(frame, chunks[2], "Get started");
        if let Some(banner) = &self.banner {
            banner.render(frame, chunks[3]);
        }
    }
}

impl Default for WelcomeScreen {
    fn default() -> Self {
        Self::new()
    }
}
