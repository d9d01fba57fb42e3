/// Session management module - Gateway

mod guard;
mod store;

pub use guard::{LoginGuard, Navigator, Route};
pub use store::SessionStore;
