pub mod account;
pub mod clock;
pub mod database;
pub mod email;
pub mod error;
pub mod jwt;
pub mod store;

pub use account::{
    AccountService, Session, CONFIRMATION_CODE_LIFETIME_HOURS, RESET_TOKEN_LIFETIME_HOURS,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use database::MongoDb;
pub use email::{
    EmailProvider, EmailService, MockEmailService, OutboundEmail, RecordingMailer,
};
pub use error::{CodeRejection, ServiceError};
pub use jwt::{JwtService, SessionClaims};
pub use store::{
    AccountStore, AccountUpdate, ConfirmationCodeStore, MemoryAccountStore, MemoryCodeStore,
};
