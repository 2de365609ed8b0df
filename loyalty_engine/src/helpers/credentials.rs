use lps_common::Secret;
use regex::Regex;

use crate::traits::AuthApiError;

pub const MAX_LOGIN_LENGTH: usize = 64;

/// Logins are 1 to 64 printable, non-whitespace characters. Passwords may contain anything, but may not be empty.
pub fn validate_credentials(login: &str, password: &Secret<String>) -> Result<(), AuthApiError> {
    let login_ok = Regex::new(r"^[[:graph:]]+$").map(|re| re.is_match(login)).unwrap_or(false);
    if !login_ok || login.chars().count() > MAX_LOGIN_LENGTH {
        return Err(AuthApiError::MalformedCredentials(format!(
            "A login must be between 1 and {MAX_LOGIN_LENGTH} printable characters without spaces"
        )));
    }
    if password.reveal().is_empty() {
        return Err(AuthApiError::MalformedCredentials("The password may not be empty".into()));
    }
    Ok(())
}
