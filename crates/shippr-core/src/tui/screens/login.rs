use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};

use super::{reject, render_form, Command};
use crate::api::LoginInput;
use crate::router::{RouteEntry, RouteName};
use crate::tui::components::{Banner, Form, FormAction, TextField};
use crate::validation::Validator;

const EMAIL: usize = 0;
const PASSWORD: usize = 1;

/// Email/password sign-in form
#[derive(Debug)]
pub struct LoginScreen {
    form: Form,
    pub(super) banner: Option<Banner>,
}

impl LoginScreen {
    /// Prefills the email when one is known (e.g. after a password reset).
    pub fn new(email: Option<&str>) -> Self {
        let mut form = Form::new(vec![
            TextField::new("Email").with_value(email.unwrap_or_default()),
            TextField::new("Password").masked(),
        ]);
        if email.is_some() {
            form.focus_field(PASSWORD);
        }
        Self { form, banner: None }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('f') && key.modifiers.contains(KeyModifiers::CONTROL) {
            let mut entry = RouteEntry::new(RouteName::ForgotPassword);
            let email = self.form.value(EMAIL).trim();
            if !email.is_empty() {
                entry = entry.with_param("email", email);
            }
            return Some(Command::Push(entry));
        }

        match self.form.handle_key(key) {
            FormAction::Submit => self.submit(),
            FormAction::Cancel => Some(Command::Back),
            FormAction::Handled | FormAction::Ignored => None,
        }
    }

    fn submit(&mut self) -> Option<Command> {
        let email = self.form.value(EMAIL).trim().to_string();
        let password = self.form.value(PASSWORD).to_string();

        if let Err(issues) = Validator::new()
            .email("Email", &email)
            .required("Password", &password)
            .finish()
        {
            return reject(&mut self.banner, issues);
        }

        self.banner = None;
        Some(Command::Login(LoginInput { email, password }))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        render_form(
            frame,
            area,
            "Log in",
            "Welcome back. Sign in with your email and password.",
            &self.form,
            self.banner.as_ref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_submit_builds_login_command() {
        let mut screen = LoginScreen::new(None);
        type_text(&mut screen, " ada@example.com ");
        screen.handle_key(key(KeyCode::Enter));
        type_text(&mut screen, "secret");

        match screen.handle_key(key(KeyCode::Enter)) {
            Some(Command::Login(input)) => {
                assert_eq!(input.email, "ada@example.com");
                assert_eq!(input.password, "secret");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_invalid_input_stays_on_form() {
        let mut screen = LoginScreen::new(None);
        type_text(&mut screen, "not-an-email");
        screen.handle_key(key(KeyCode::Tab));

        assert!(screen.handle_key(key(KeyCode::Enter)).is_none());
        let banner = screen.banner.clone().expect("validation banner");
        assert_eq!(
            banner.lines,
            vec![
                "Email must be a valid email address".to_string(),
                "Password is required".to_string()
            ]
        );

        // fields remain editable after a rejected submit
        type_text(&mut screen, "x");
        assert_eq!(screen.form.value(PASSWORD), "x");
    }

    #[test]
    fn test_prefilled_email_focuses_password() {
        let screen = LoginScreen::new(Some("ada@example.com"));
        assert_eq!(screen.form.value(EMAIL), "ada@example.com");
        assert_eq!(screen.form.focus(), PASSWORD);
    }

    #[test]
    fn test_ctrl_f_carries_email() {
        let mut screen = LoginScreen::new(None);
        type_text(&mut screen, "ada@example.com");

        let ctrl_f = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL);
        match screen.handle_key(ctrl_f) {
            Some(Command::Push(entry)) => {
                assert_eq!(entry.name, RouteName::ForgotPassword);
                assert_eq!(entry.param("email"), Some("ada@example.com"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_escape_goes_back() {
        let mut screen = LoginScreen::new(None);
        assert!(matches!(screen.handle_key(key(KeyCode::Esc)), Some(Command::Back)));
    }
}
