//! Screens, one per route
//!
//! A screen owns its local field state, turns keys into [`Command`]s and
//! renders itself. The [`App`](super::App) performs the commands.

mod create_account;
mod dashboard;
mod forgot_password;
mod login;
mod reset_password;
mod welcome;

pub use create_account::CreateAccountScreen;
pub use dashboard::DashboardScreen;
pub use forgot_password::ForgotPasswordScreen;
pub use login::LoginScreen;
pub use reset_password::ResetPasswordScreen;
pub use welcome::WelcomeScreen;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use super::components::{Banner, Form};
use super::theme::{MUTED, PRIMARY};
use crate::api::{
    ApiError, CreateUserInput, LoginInput, RequestPasswordResetInput, ResetPasswordInput,
};
use crate::auth::TokenClaims;
use crate::router::{RouteEntry, RouteName};

/// Something a screen asks the app to do
#[derive(Debug, Clone)]
pub enum Command {
    /// Navigate forward
    Push(RouteEntry),
    /// Navigate back
    Back,
    /// Call `auth.login`
    Login(LoginInput),
    /// Call `auth.createUser`
    CreateAccount(CreateUserInput),
    /// Call `auth.requestPasswordReset`
    RequestPasswordReset(RequestPasswordResetInput),
    /// Call `auth.resetPassword`
    ResetPassword(ResetPasswordInput),
    /// Fetch the message of the day
    LoadDashboard,
    /// Call `user.refresh`, then reload the dashboard
    RefreshSession,
    /// Drop the session and return to the welcome screen
    SignOut,
    /// Exit the application
    Quit,
}

impl Command {
    /// Label shown while the command runs, for commands that hit the API
    pub fn busy_label(&self) -> Option<&'static str> {
        match self {
            Self::Login(_) => Some("Logging in…"),
            Self::CreateAccount(_) => Some("Creating account…"),
            Self::RequestPasswordReset(_) => Some("Requesting reset code…"),
            Self::ResetPassword(_) => Some("Resetting password…"),
            Self::LoadDashboard => Some("Loading…"),
            Self::RefreshSession => Some("Refreshing…"),
            Self::Push(_) | Self::Back | Self::SignOut | Self::Quit => None,
        }
    }
}

/// The screen for the current route
#[derive(Debug)]
pub enum Screen {
    Welcome(WelcomeScreen),
    Login(LoginScreen),
    CreateAccount(CreateAccountScreen),
    ForgotPassword(ForgotPasswordScreen),
    ResetPassword(ResetPasswordScreen),
    Dashboard(DashboardScreen),
}

impl Screen {
    /// Builds fresh screen state for `entry`.
    pub fn for_route(entry: &RouteEntry, claims: Option<TokenClaims>) -> Self {
        match entry.name {
            RouteName::Welcome => Self::Welcome(WelcomeScreen::new()),
            RouteName::Login => Self::Login(LoginScreen::new(entry.param("email"))),
            RouteName::CreateAccount => Self::CreateAccount(CreateAccountScreen::new()),
            RouteName::ForgotPassword => {
                Self::ForgotPassword(ForgotPasswordScreen::new(entry.param("email")))
            }
            RouteName::ResetPassword => {
                Self::ResetPassword(ResetPasswordScreen::new(entry.param("email")))
            }
            RouteName::Dashboard => Self::Dashboard(DashboardScreen::new(claims)),
        }
    }

    /// Command to run as soon as the screen is shown
    pub fn on_enter(&self) -> Option<Command> {
        match self {
            Self::Dashboard(_) => Some(Command::LoadDashboard),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        match self {
            Self::Welcome(s) => s.handle_key(key),
            Self::Login(s) => s.handle_key(key),
            Self::CreateAccount(s) => s.handle_key(key),
            Self::ForgotPassword(s) => s.handle_key(key),
            Self::ResetPassword(s) => s.handle_key(key),
            Self::Dashboard(s) => s.handle_key(key),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Self::Welcome(s) => s.render(frame, area),
            Self::Login(s) => s.render(frame, area),
            Self::CreateAccount(s) => s.render(frame, area),
            Self::ForgotPassword(s) => s.render(frame, area),
            Self::ResetPassword(s) => s.render(frame, area),
            Self::Dashboard(s) => s.render(frame, area),
        }
    }

    /// Shows a message block on the screen
    pub fn show_banner(&mut self, banner: Banner) {
        let slot = match self {
            Self::Welcome(s) => &mut s.banner,
            Self::Login(s) => &mut s.banner,
            Self::CreateAccount(s) => &mut s.banner,
            Self::ForgotPassword(s) => &mut s.banner,
            Self::ResetPassword(s) => &mut s.banner,
            Self::Dashboard(s) => &mut s.banner,
        };
        *slot = Some(banner);
    }

    /// Shows a classified API error, including validation issues
    pub fn show_error(&mut self, err: &ApiError) {
        self.show_banner(Banner::error(err.display_lines()));
    }

    /// Current message block, if any
    pub fn banner(&self) -> Option<&Banner> {
        match self {
            Self::Welcome(s) => s.banner.as_ref(),
            Self::Login(s) => s.banner.as_ref(),
            Self::CreateAccount(s) => s.banner.as_ref(),
            Self::ForgotPassword(s) => s.banner.as_ref(),
            Self::ResetPassword(s) => s.banner.as_ref(),
            Self::Dashboard(s) => s.banner.as_ref(),
        }
    }

    /// Whether a bare `q` quits (menus only, forms need the letter)
    pub fn accepts_quit_key(&self) -> bool {
        matches!(self, Self::Welcome(_) | Self::Dashboard(_))
    }

    /// Key hints for the status bar
    pub fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Welcome(_) => &[("↑/↓", "Move"), ("Enter", "Select"), ("q", "Quit")],
            Self::Login(_) => &[
                ("Tab", "Next field"),
                ("Enter", "Submit"),
                ("Ctrl+F", "Forgot password"),
                ("Esc", "Back"),
            ],
            Self::CreateAccount(_) | Self::ForgotPassword(_) | Self::ResetPassword(_) => {
                &[("Tab", "Next field"), ("Enter", "Submit"), ("Esc", "Back")]
            }
            Self::Dashboard(_) => &[
                ("↑/↓", "Move"),
                ("Enter", "Select"),
                ("r", "Refresh"),
                ("q", "Quit"),
            ],
        }
    }

    pub fn as_dashboard_mut(&mut self) -> Option<&mut DashboardScreen> {
        match self {
            Self::Dashboard(s) => Some(s),
            _ => None,
        }
    }

    pub fn route_name(&self) -> RouteName {
        match self {
            Self::Welcome(_) => RouteName::Welcome,
            Self::Login(_) => RouteName::Login,
            Self::CreateAccount(_) => RouteName::CreateAccount,
            Self::ForgotPassword(_) => RouteName::ForgotPassword,
            Self::ResetPassword(_) => RouteName::ResetPassword,
            Self::Dashboard(_) => RouteName::Dashboard,
        }
    }
}

/// Centered form layout: title, subtitle, fields, then the banner.
pub(crate) fn render_form(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    subtitle: &str,
    form: &Form,
    banner: Option<&Banner>,
) {
    let banner_height = banner.map_or(0, Banner::height);
    let height = 2 + form.height() + banner_height + 1;
    let area = super::ui::centered_box(60, height, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(form.height()),
            Constraint::Length(1),
            Constraint::Length(banner_height),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(title.to_string()).style(Style::default().fg(PRIMARY).bold())),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(subtitle.to_string()).style(Style::default().fg(MUTED)),
        chunks[1],
    );
    form.render(frame, chunks[2]);
    if let Some(banner) = banner {
        banner.render(frame, chunks[4]);
    }
}

/// Shared handling of form validation failures
pub(crate) fn reject(banner: &mut Option<Banner>, issues: Vec<String>) -> Option<Command> {
    *banner = Some(Banner::error(issues));
    None
}
