//! Hooks for switching between the login form and the authenticated view

/// Implemented by the presentation layer
pub trait SessionUi: Send + Sync {
    /// Hide the login form and show the calendar
    fn show_authenticated(&self);

    /// Hide authenticated content and show the login form
    fn show_login(&self);
}

/// UI that ignores every transition
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUi;

impl SessionUi for NoopUi {
    fn show_authenticated(&self) {}

    fn show_login(&self) {}
}
