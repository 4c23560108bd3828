pub mod password;
pub mod validation;

pub use password::{hash_password, verify_password, Password, PasswordError, PasswordHashString};
pub use validation::ValidatedJson;
