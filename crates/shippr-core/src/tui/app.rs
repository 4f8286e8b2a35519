//! Main TUI application state and logic

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use tracing::{info, warn};

use super::components::Banner;
use super::event::{is_quit, Event, EventHandler};
use super::screens::{Command, Screen};
use crate::api::{ApiClient, ApiError, ApiErrorKind, AuthPayload};
use crate::auth::{CredentialStore, TokenClaims, TokenStatus};
use crate::config::TuiConfig;
use crate::error::{Error, Result};
use crate::router::{RouteEntry, RouteName, Router};

const STATUS_TTL: Duration = Duration::from_secs(5);

/// Main TUI application state
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,
    router: Router,
    screen: Screen,
    screen_route: RouteEntry,
    api: ApiClient,
    credentials: CredentialStore,
    pending: VecDeque<Command>,
    busy: Option<&'static str>,
    status_message: Option<(String, Instant)>,
    tick_rate: Duration,
}

impl App {
    /// Create the app, choosing the first route from the stored session
    pub fn new(api: ApiClient, config: &TuiConfig) -> Self {
        let credentials = api.credentials().clone();
        let router = Router::initial(&credentials);
        let screen_route = router.current().clone();
        let screen = Screen::for_route(&screen_route, session_claims(&credentials));

        let mut app = Self {
            should_quit: false,
            router,
            screen,
            screen_route,
            api,
            credentials,
            pending: VecDeque::new(),
            busy: None,
            status_message: None,
            tick_rate: Duration::from_millis(config.tick_rate_ms),
        };
        if let Some(command) = app.screen.on_enter() {
            app.pending.push_back(command);
        }
        app
    }

    pub fn route(&self) -> &RouteEntry {
        self.router.current()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn api_url(&self) -> &str {
        self.api.base_url()
    }

    /// Label of the command currently running
    pub fn busy(&self) -> Option<&'static str> {
        self.busy
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Protected routes only survive `sync` with a valid session
    pub fn signed_in(&self) -> bool {
        self.route().name.is_protected()
    }

    /// Set a status message that expires after a few seconds
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Get current status message if not expired
    pub fn get_status(&self) -> Option<&str> {
        self.status_message.as_ref().and_then(|(msg, time)| {
            if time.elapsed() < STATUS_TTL {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    /// Re-validate the current route and rebuild the screen if it changed.
    /// Runs before every draw.
    pub fn sync(&mut self) {
        if self.router.enforce(&self.credentials) {
            self.pending.clear();
            self.set_status("Your session has ended, please log in again");
        }

        if self.router.current() != &self.screen_route {
            self.screen_route = self.router.current().clone();
            self.screen = Screen::for_route(&self.screen_route, session_claims(&self.credentials));
            if let Some(command) = self.screen.on_enter() {
                self.pending.push_back(command);
            }
        }
    }

    /// Translate a key into a queued command
    pub fn on_key(&mut self, key: KeyEvent) {
        if is_quit(key) {
            self.should_quit = true;
            return;
        }
        if self.busy.is_some() || self.has_pending() {
            return;
        }
        if key.code == KeyCode::Char('q') && self.screen.accepts_quit_key() {
            self.should_quit = true;
            return;
        }

        if let Some(command) = self.screen.handle_key(key) {
            self.busy = command.busy_label();
            self.pending.push_back(command);
        }
    }

    /// Run the next queued command, if any
    pub async fn step(&mut self) -> bool {
        let Some(command) = self.pending.pop_front() else {
            return false;
        };
        self.busy = command.busy_label();
        self.perform(command).await;
        self.busy = None;
        self.sync();
        true
    }

    /// Run queued commands until none are left
    pub async fn drain(&mut self) {
        self.sync();
        while self.step().await {}
    }

    async fn perform(&mut self, command: Command) {
        match command {
            Command::Quit => self.should_quit = true,
            Command::Push(entry) => self.router.push(entry),
            Command::Back => {
                self.router.pop();
            }
            Command::Login(input) => match self.api.login(&input).await {
                Ok(payload) => self.start_session(payload, "Logged in"),
                Err(err) => self.show_error(&err),
            },
            Command::CreateAccount(input) => match self.api.create_user(&input).await {
                Ok(payload) => self.start_session(payload, "Account created"),
                Err(err) => self.show_error(&err),
            },
            Command::RequestPasswordReset(input) => {
                match self.api.request_password_reset(&input).await {
                    Ok(ack) => {
                        self.router.replace(
                            RouteEntry::new(RouteName::ResetPassword).with_param("email", input.email),
                        );
                        self.sync();
                        self.screen.show_banner(Banner::info(ack.message.unwrap_or_else(|| {
                            "Check your email for a reset code".to_string()
                        })));
                    }
                    Err(err) => self.show_error(&err),
                }
            }
            Command::ResetPassword(input) => match self.api.reset_password(&input).await {
                Ok(ack) => {
                    self.router.reset(RouteName::Welcome);
                    self.router
                        .push(RouteEntry::new(RouteName::Login).with_param("email", input.email));
                    self.sync();
                    self.screen.show_banner(Banner::success(ack.message.unwrap_or_else(|| {
                        "Password updated, please log in".to_string()
                    })));
                    self.set_status("Password reset");
                }
                Err(err) => self.show_error(&err),
            },
            Command::LoadDashboard => match self.api.random_motd().await {
                Ok(motd) => {
                    if let Some(dashboard) = self.screen.as_dashboard_mut() {
                        dashboard.set_motd(motd);
                    }
                }
                Err(err) => self.show_error(&err),
            },
            Command::RefreshSession => match self.api.refresh_user().await {
                Ok(payload) => {
                    if let Err(e) = self.credentials.save(&payload.token) {
                        self.show_local_error(&e);
                        return;
                    }
                    let claims = session_claims(&self.credentials);
                    if let Some(dashboard) = self.screen.as_dashboard_mut() {
                        dashboard.set_user(payload.user, claims);
                    }
                    self.set_status("Session refreshed");
                    self.pending.push_back(Command::LoadDashboard);
                }
                Err(err) => self.show_error(&err),
            },
            Command::SignOut => {
                if let Err(e) = self.credentials.clear() {
                    warn!(error = %e, "Failed to clear credentials on sign out");
                }
                info!("Signed out");
                self.router.reset(RouteName::Welcome);
                self.set_status("Signed out");
            }
        }
    }

    fn start_session(&mut self, payload: AuthPayload, message: &str) {
        if let Err(e) = self.credentials.save(&payload.token) {
            self.show_local_error(&e);
            return;
        }

        self.router.reset(RouteName::Dashboard);
        self.sync();
        let claims = session_claims(&self.credentials);
        if let Some(dashboard) = self.screen.as_dashboard_mut() {
            dashboard.set_user(payload.user, claims);
        }
        self.set_status(message);
    }

    fn show_error(&mut self, err: &ApiError) {
        if err.kind == ApiErrorKind::Unauthorized && self.route().name.is_protected() {
            // credentials are already gone; the guard redirects on the next sync
            self.set_status(err.message.clone());
            return;
        }
        self.screen.show_error(err);
    }

    fn show_local_error(&mut self, err: &Error) {
        warn!(error = %err, "Local operation failed");
        self.screen.show_banner(Banner::error(vec![err.to_string()]));
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        };
        use ratatui::{backend::CrosstermBackend, Terminal};
        use std::io;

        // Setup terminal
        enable_raw_mode().map_err(Error::tui)?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(Error::tui)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(Error::tui)?;

        let result = self.event_loop(&mut terminal).await;

        // Restore terminal even if the loop failed
        disable_raw_mode().map_err(Error::tui)?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(Error::tui)?;
        terminal.show_cursor().map_err(Error::tui)?;

        result
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut ratatui::Terminal<B>,
    ) -> Result<()> {
        let mut events = EventHandler::new(self.tick_rate.as_millis() as u64);
        events.start();

        info!(route = %self.route().name, "TUI started");
        while !self.should_quit {
            self.sync();
            terminal
                .draw(|frame| super::ui::draw(frame, self))
                .map_err(Error::tui)?;

            // Commands run between draws so the busy label is visible
            if self.step().await {
                // keys typed while the command ran are dropped, except Ctrl+C
                if events.drain_keys().into_iter().any(is_quit) {
                    self.should_quit = true;
                }
                continue;
            }

            match events.next().await {
                Some(Event::Key(key)) => self.on_key(key),
                Some(Event::Tick | Event::Resize(_, _)) => {}
                None => break,
            }
        }
        info!("TUI stopped");

        Ok(())
    }
}

/// Claims of the stored token when it is usable
fn session_claims(credentials: &CredentialStore) -> Option<TokenClaims> {
    match credentials.status(Utc::now()) {
        TokenStatus::Valid(claims) => Some(claims),
        _ => None,
    }
}
