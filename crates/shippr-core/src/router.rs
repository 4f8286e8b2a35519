//! # Routing
//!
//! In-memory navigation stack for the terminal UI.
//!
//! The stack always holds at least one [`RouteEntry`]. Routes flagged as
//! protected are re-checked against the stored session through an
//! [`AuthGuard`] before every render.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::{CredentialStore, TokenStatus};

/// Screens the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteName {
    /// Landing menu for signed-out users.
    Welcome,
    /// Email/password sign-in form.
    Login,
    /// Sign-up form.
    CreateAccount,
    /// Request a password reset code.
    ForgotPassword,
    /// Enter the reset code and a new password.
    ResetPassword,
    /// Signed-in home screen.
    Dashboard,
}

impl RouteName {
    /// Whether the route needs a valid session.
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Dashboard)
    }

    /// Human readable title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Login => "Log in",
            Self::CreateAccount => "Create account",
            Self::ForgotPassword => "Forgot password",
            Self::ResetPassword => "Reset password",
            Self::Dashboard => "Dashboard",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// String parameters attached to a route.
pub type RouteParams = BTreeMap<String, String>;

/// One entry of the navigation stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Which screen to show.
    pub name: RouteName,
    /// Optional parameters for that screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<RouteParams>,
}

impl RouteEntry {
    /// Entry without parameters.
    pub fn new(name: RouteName) -> Self {
        Self { name, params: None }
    }

    /// Adds a parameter, creating the map on first use.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(RouteParams::new)
            .insert(key.into(), value.into());
        self
    }

    /// Looks up a parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.as_ref()?.get(key).map(String::as_str)
    }
}

impl From<RouteName> for RouteEntry {
    fn from(name: RouteName) -> Self {
        Self::new(name)
    }
}

/// Source of truth for whether protected routes may be shown.
pub trait AuthGuard {
    /// Current state of the stored session token.
    fn token_status(&self) -> TokenStatus;

    /// Discards the stored session token.
    fn revoke(&self);
}

impl AuthGuard for CredentialStore {
    fn token_status(&self) -> TokenStatus {
        self.status(Utc::now())
    }

    fn revoke(&self) {
        if let Err(e) = self.clear() {
            warn!(error = %e, "Failed to clear credentials");
        }
    }
}

/// Navigation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    stack: Vec<RouteEntry>,
}

impl Router {
    /// Router whose only entry is `root`.
    pub fn new(root: impl Into<RouteEntry>) -> Self {
        Self {
            stack: vec![root.into()],
        }
    }

    /// Picks the starting route from the stored session.
    ///
    /// A stored token that is malformed or expired is revoked.
    pub fn initial(guard: &impl AuthGuard) -> Self {
        let status = guard.token_status();
        if status.is_valid() {
            info!("Stored session is valid, starting on dashboard");
            return Self::new(RouteName::Dashboard);
        }

        if status.is_stale() {
            info!(?status, "Discarding stale session");
            guard.revoke();
        }
        Self::new(RouteName::Welcome)
    }

    /// The route on top of the stack.
    pub fn current(&self) -> &RouteEntry {
        // the stack is never empty
        &self.stack[self.stack.len() - 1]
    }

    /// Number of entries on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether [`Router::pop`] would do anything.
    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// Entries from bottom to top.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.stack
    }

    /// Navigates forward to `entry`.
    pub fn push(&mut self, entry: impl Into<RouteEntry>) {
        let entry = entry.into();
        debug!(route = %entry.name, depth = self.stack.len() + 1, "push");
        self.stack.push(entry);
    }

    /// Navigates back, returning the entry that was left.
    ///
    /// The root entry is never popped.
    pub fn pop(&mut self) -> Option<RouteEntry> {
        if !self.can_go_back() {
            return None;
        }
        let popped = self.stack.pop();
        debug!(route = %self.current().name, depth = self.stack.len(), "pop");
        popped
    }

    /// Swaps the current entry for `entry`.
    pub fn replace(&mut self, entry: impl Into<RouteEntry>) {
        let entry = entry.into();
        debug!(route = %entry.name, "replace");
        let top = self.stack.len() - 1;
        self.stack[top] = entry;
    }

    /// Discards all history, leaving only `entry`.
    pub fn reset(&mut self, entry: impl Into<RouteEntry>) {
        let entry = entry.into();
        debug!(route = %entry.name, "reset");
        self.stack.clear();
        self.stack.push(entry);
    }

    /// Redirects to the welcome screen when the current route is protected
    /// and the session is no longer valid. Returns `true` on redirect.
    pub fn enforce(&mut self, guard: &impl AuthGuard) -> bool {
        let route = self.current().name;
        if !route.is_protected() {
            return false;
        }

        let status = guard.token_status();
        if status.is_valid() {
            return false;
        }

        warn!(route = %route, ?status, "Session invalid on protected route, redirecting");
        guard.revoke();
        self.reset(RouteName::Welcome);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenClaims;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};

    struct FakeGuard {
        status: RefCell<TokenStatus>,
        revoked: Cell<bool>,
    }

    impl FakeGuard {
        fn new(status: TokenStatus) -> Self {
            Self {
                status: RefCell::new(status),
                revoked: Cell::new(false),
            }
        }
    }

    impl AuthGuard for FakeGuard {
        fn token_status(&self) -> TokenStatus {
            self.status.borrow().clone()
        }

        fn revoke(&self) {
            self.revoked.set(true);
            *self.status.borrow_mut() = TokenStatus::Missing;
        }
    }

    fn valid() -> TokenStatus {
        TokenStatus::Valid(TokenClaims::default())
    }

    #[test]
    fn test_initial_route_with_valid_token() {
        let guard = FakeGuard::new(valid());
        let router = Router::initial(&guard);

        assert_eq!(router.current().name, RouteName::Dashboard);
        assert!(!guard.revoked.get());
    }

    #[test]
    fn test_initial_route_without_token() {
        let guard = FakeGuard::new(TokenStatus::Missing);
        let router = Router::initial(&guard);

        assert_eq!(router.current().name, RouteName::Welcome);
        assert!(!guard.revoked.get());
    }

    #[test]
    fn test_initial_route_revokes_expired_token() {
        let guard = FakeGuard::new(TokenStatus::Expired {
            expired_at: Utc::now(),
        });
        let router = Router::initial(&guard);

        assert_eq!(router.current().name, RouteName::Welcome);
        assert!(guard.revoked.get());
    }

    #[test]
    fn test_pop_never_empties_stack() {
        let mut router = Router::new(RouteName::Welcome);

        assert_eq!(router.pop(), None);
        assert_eq!(router.depth(), 1);
        assert_eq!(router.current().name, RouteName::Welcome);
    }

    #[test]
    fn test_replace_and_reset() {
        let mut router = Router::new(RouteName::Welcome);
        router.push(RouteName::ForgotPassword);
        router.replace(RouteEntry::new(RouteName::ResetPassword).with_param("email", "a@b.co"));

        assert_eq!(router.depth(), 2);
        assert_eq!(router.current().param("email"), Some("a@b.co"));

        router.reset(RouteName::Dashboard);
        assert_eq!(router.entries(), &[RouteEntry::new(RouteName::Dashboard)]);
    }

    #[test]
    fn test_enforce_ignores_public_routes() {
        let guard = FakeGuard::new(TokenStatus::Missing);
        let mut router = Router::new(RouteName::Welcome);
        router.push(RouteName::Login);

        assert!(!router.enforce(&guard));
        assert_eq!(router.current().name, RouteName::Login);
    }

    #[test]
    fn test_enforce_keeps_valid_session() {
        let guard = FakeGuard::new(valid());
        let mut router = Router::new(RouteName::Dashboard);

        assert!(!router.enforce(&guard));
        assert_eq!(router.current().name, RouteName::Dashboard);
    }

    #[test]
    fn test_enforce_redirects_on_invalid_session() {
        for status in [
            TokenStatus::Missing,
            TokenStatus::Malformed("bad".into()),
            TokenStatus::Expired {
                expired_at: Utc::now(),
            },
        ] {
            let guard = FakeGuard::new(status);
            let mut router = Router::new(RouteName::Welcome);
            router.push(RouteName::Dashboard);

            assert!(router.enforce(&guard));
            assert_eq!(router.entries(), &[RouteEntry::new(RouteName::Welcome)]);
            assert!(guard.revoked.get());
        }
    }

    fn route_name() -> impl Strategy<Value = RouteName> {
        prop_oneof![
            Just(RouteName::Welcome),
            Just(RouteName::Login),
            Just(RouteName::CreateAccount),
            Just(RouteName::ForgotPassword),
            Just(RouteName::ResetPassword),
            Just(RouteName::Dashboard),
        ]
    }

    fn route_entry() -> impl Strategy<Value = RouteEntry> {
        (
            route_name(),
            proptest::option::of(proptest::collection::btree_map("[a-z]{1,8}", ".{0,12}", 0..4)),
        )
            .prop_map(|(name, params)| RouteEntry { name, params })
    }

    proptest! {
        #[test]
        fn push_then_pop_restores_previous(
            history in proptest::collection::vec(route_entry(), 1..8),
            next in route_entry(),
        ) {
            let mut router = Router::new(history[0].clone());
            for entry in &history[1..] {
                router.push(entry.clone());
            }
            let before = router.clone();

            router.push(next.clone());
            prop_assert_eq!(router.pop(), Some(next));
            prop_assert_eq!(router, before);
        }
    }
}
