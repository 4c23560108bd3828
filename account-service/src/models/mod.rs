mod account;
mod confirmation_code;

pub use account::{Account, AccountStatus};
pub use confirmation_code::ConfirmationCode;
