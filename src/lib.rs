pub mod api;
pub mod app;
pub mod cli;
pub mod constants;
pub mod session;
pub mod storage;
pub mod utils;

pub use api::{ApiClient, ApiResponse, DormService, Envelope, RequestDescriptor};
pub use app::{load_config, AppState, Config, ConfigStore};
pub use session::{LoginGuard, Navigator, Route, SessionStore};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use utils::DormError;
