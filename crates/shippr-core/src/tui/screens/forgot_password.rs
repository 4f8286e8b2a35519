use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use super::{reject, render_form, Command};
use crate::api::RequestPasswordResetInput;
use crate::tui::components::{Banner, Form, FormAction, TextField};
use crate::validation::Validator;

/// Asks for the email that should receive a reset code
#[derive(Debug)]
pub struct ForgotPasswordScreen {
    form: Form,
    pub(super) banner: Option<Banner>,
}

impl ForgotPasswordScreen {
    pub fn new(email: Option<&str>) -> Self {
        Self {
            form: Form::new(vec![
                TextField::new("Email").with_value(email.unwrap_or_default())
            ]),
            banner: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        match self.form.handle_key(key) {
            FormAction::Submit => self.submit(),
            FormAction::Cancel => Some(Command::Back),
            FormAction::Handled | FormAction::Ignored => None,
        }
    }

    fn submit(&mut self) -> Option<Command> {
        let email = self.form.value(0).trim().to_string();

        if let Err(issues) = Validator::new().email("Email", &email).finish() {
            return reject(&mut self.banner, issues);
        }

        self.banner = None;
        Some(Command::RequestPasswordReset(RequestPasswordResetInput {
            email,
        }))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        render_form(
            frame,
            area,
            "Forgot password",
            "We'll email you a code to reset your password.",
            &self.form,
            self.banner.as_ref(),
        );
    }
}
