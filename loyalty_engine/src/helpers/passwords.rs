//! Password hashes and session tokens.
//!
//! Passwords are stored as Argon2id PHC strings. The string carries its own salt and parameters, so nothing else
//! needs to be kept next to it.
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2,
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
};
use lps_common::Secret;
use rand::{distributions::Alphanumeric, Rng};

use crate::traits::AuthApiError;

const SESSION_TOKEN_LENGTH: usize = 32;

/// Generates a fresh, unguessable session token.
pub fn new_session_token() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(SESSION_TOKEN_LENGTH).map(char::from).collect()
}

pub fn hash_password(password: &Secret<String>) -> Result<String, AuthApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.reveal().as_bytes(), &salt)
        .map_err(|e| AuthApiError::HashingError(e.to_string()))?;
    Ok(hash.to_string())
}

/// False if the password does not match, or if `phc_hash` is not a hash this module produced.
pub fn verify_password(password: &Secret<String>, phc_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(phc_hash) else {
        return false;
    };
    Argon2::default().verify_password(password.reveal().as_bytes(), &parsed).is_ok()
}
