//! HTTP handlers for account-service.

pub mod confirmation;
pub mod password;
pub mod session;
pub mod signup;

pub use confirmation::{activate, send_confirmation};
pub use password::{reset_password, send_reset_email};
pub use session::login;
pub use signup::signup;
