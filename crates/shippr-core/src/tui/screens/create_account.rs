use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use super::{reject, render_form, Command};
use crate::api::CreateUserInput;
use crate::tui::components::{Banner, Form, FormAction, TextField};
use crate::validation::Validator;

const NAME: usize = 0;
const EMAIL: usize = 1;
const PASSWORD: usize = 2;
const CONFIRM: usize = 3;

/// Sign-up form
#[derive(Debug)]
pub struct CreateAccountScreen {
    form: Form,
    pub(super) banner: Option<Banner>,
}

impl CreateAccountScreen {
    pub fn new() -> Self {
        Self {
            form: Form::new(vec![
                TextField::new("Name"),
                TextField::new("Email"),
                TextField::new("Password").masked(),
                TextField::new("Confirm password").masked(),
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
        let name = self.form.value(NAME).trim().to_string();
        let email = self.form.value(EMAIL).trim().to_string();
        let password = self.form.value(PASSWORD).to_string();
        let confirm = self.form.value(CONFIRM);

        if let Err(issues) = Validator::new()
            .required("Name", &name)
            .email("Email", &email)
            .password("Password", &password)
            .matches("Confirm password", confirm, &password)
            .finish()
        {
            return reject(&mut self.banner, issues);
        }

        self.banner = None;
        Some(Command::CreateAccount(CreateUserInput {
            name,
            email,
            password,
        }))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        render_form(
            frame,
            area,
            "Create account",
            "Pick a name, your email and a password of 8+ characters.",
            &self.form,
            self.banner.as_ref(),
        );
    }
}

impl Default for CreateAccountScreen {
    fn default() -> Self {
        Self::new()
    }
}
