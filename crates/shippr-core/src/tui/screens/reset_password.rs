use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use super::{reject, render_form, Command};
use crate::api::ResetPasswordInput;
use crate::tui::components::{Banner, Form, FormAction, TextField};
use crate::validation::Validator;

const EMAIL: usize = 0;
const CODE: usize = 1;
const PASSWORD: usize = 2;
const CONFIRM: usize = 3;

/// Reset code plus a new password
#[derive(Debug)]
pub struct ResetPasswordScreen {
    form: Form,
    pub(super) banner: Option<Banner>,
}

impl ResetPasswordScreen {
    /// Starts on the code field when the email is already known.
    pub fn new(email: Option<&str>) -> Self {
        let mut form = Form::new(vec![
            TextField::new("Email").with_value(email.unwrap_or_default()),
            TextField::new("Reset code"),
            TextField::new("New password").masked(),
            TextField::new("Confirm new password").masked(),
        ]);
        if email.is_some() {
            form.focus_field(CODE);
        }
        Self { form, banner: None }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        match self.form.handle_key(key) {
            FormAction::Submit => self.submit(),
            FormAction::Cancel => Some(Command::Back),
            FormAction::Handled | FormAction::Ignored => None,
        }
    }

    fn submit(&mut self) -> Option<Command> {
        let email = self.form.value(EMAIL).trim().to_string();
        let code = self.form.value(CODE).trim().to_string();
        let password = self.form.value(PASSWORD).to_string();
        let confirm = self.form.value(CONFIRM);

        if let Err(issues) = Validator::new()
            .email("Email", &email)
            .required("Reset code", &code)
            .password("New password", &password)
            .matches("Confirm new password", confirm, &password)
            .finish()
        {
            return reject(&mut self.banner, issues);
        }

        self.banner = None;
        Some(Command::ResetPassword(ResetPasswordInput {
            email,
            code,
            password,
        }))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        render_form(
            frame,
            area,
            "Reset password",
            "Enter the code from your email and choose a new password.",
            &self.form,
            self.banner.as_ref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(screen: &mut ResetPasswordScreen, code: KeyCode) -> Option<Command> {
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(screen: &mut ResetPasswordScreen, text: &str) {
        for c in text.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_submit_with_known_email() {
        let mut screen = ResetPasswordScreen::new(Some("ada@example.com"));
        assert_eq!(screen.form.focus(), CODE);

        type_text(&mut screen, "123456");
        press(&mut screen, KeyCode::Enter);
        type_text(&mut screen, "new-password");
        press(&mut screen, KeyCode::Enter);
        type_text(&mut screen, "new-password");

        match press(&mut screen, KeyCode::Enter) {
            Some(Command::ResetPassword(input)) => {
                assert_eq!(input.email, "ada@example.com");
                assert_eq!(input.code, "123456");
                assert_eq!(input.password, "new-password");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_short_password_is_rejected() {
        let mut screen = ResetPasswordScreen::new(Some("ada@example.com"));
        type_text(&mut screen, "123456");
        press(&mut screen, KeyCode::Tab);
        type_text(&mut screen, "short");
        press(&mut screen, KeyCode::Tab);
        type_text(&mut screen, "short");

        assert!(press(&mut screen, KeyCode::Enter).is_none());
        assert_eq!(
            screen.banner.unwrap().lines,
            vec!["New password must be at least 8 characters".to_string()]
        );
    }
}
