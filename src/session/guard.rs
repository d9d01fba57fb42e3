use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::store::SessionStore;

/// Client screens a navigation side effect can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    Index,
    Profile,
    Dorm,
    DormChange,
    Repair,
    Visitor,
    Bill,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Route::Login => "login",
            Route::Register => "register",
            Route::ForgotPassword => "forgot",
            Route::Index => "index",
            Route::Profile => "profile",
            Route::Dorm => "dorm",
            Route::DormChange => "dorm_change",
            Route::Repair => "repair",
            Route::Visitor => "visitor",
            Route::Bill => "bill",
        };
        write!(f, "{}", name)
    }
}

/// Navigation side effect performed by the guard
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Replace the current screen with `route`
    fn redirect(&self, route: Route);
}

/// Client-side gate for protected screens.
///
/// Only decides whether protected content should be rendered. It is not an
/// authorization boundary; the backend enforces access on every call.
pub struct LoginGuard<N: Navigator> {
    session: Arc<SessionStore>,
    navigator: N,
}

impl<N: Navigator> LoginGuard<N> {
    pub fn new(session: Arc<SessionStore>, navigator: N) -> Self {
        Self { session, navigator }
    }

    /// Returns true when a profile is stored. Otherwise redirects to the
    /// login screen (every time it is called) and returns false.
    pub fn ensure_logged_in(&self) -> bool {
        if self.session.is_logged_in() {
            return true;
        }

        debug!("No stored profile, redirecting to {}", Route::Login);
        self.navigator.redirect(Route::Login);
        false
    }
}
