mod credentials;
mod passwords;

pub use credentials::{validate_credentials, MAX_LOGIN_LENGTH};
pub use passwords::{hash_password, new_session_token, verify_password};
