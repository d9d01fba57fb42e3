// Gateway module for the backend API - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod client;
mod envelope;
mod forms;
mod service;
mod types;

// Public re-exports - the ONLY way to access API functionality
pub use client::{join_url, ApiClient};
pub use envelope::Envelope;
pub use forms::{
    DormChangeForm, ForgotPasswordForm, LocationType, LoginForm, PayBillForm, RegisterForm,
    RepairForm, RepairType, UserType, VisitorForm,
};
pub use service::DormService;
pub use types::{ApiResponse, RequestDescriptor};
