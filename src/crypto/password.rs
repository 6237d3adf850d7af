//! Salted password hashing for staff accounts.
//!
//! The `users` table stores the algorithm tag and the encoded hash in
//! separate columns. `pbkdf2-sha256` hashes encode as
//! `<iterations>$<salt b64>$<digest b64>`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::Rng;
use zeroize::Zeroizing;

use super::keys::{generate_salt, PasswordDigest, MAX_PBKDF2_ITERATIONS, PBKDF2_ITERATIONS};
use super::CryptoError;
use crate::models::enums::HashMethod;

const BOOTSTRAP_SECRET_LENGTH: usize = 20;

/// A password hash ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword {
    pub method: HashMethod,
    pub encoded: String,
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str, method: HashMethod) -> HashedPassword {
    let salt = generate_salt();
    let encoded = match method {
        HashMethod::Pbkdf2Sha256 => {
            let digest = PasswordDigest::pbkdf2(password, &salt, PBKDF2_ITERATIONS);
            format!(
                "{PBKDF2_ITERATIONS}${}${}",
                STANDARD.encode(salt),
                STANDARD.encode(digest.as_bytes())
            )
        }
    };
    HashedPassword { method, encoded }
}

/// Recompute the hash of `password` with the stored parameters and compare
/// in constant time.
pub fn verify_password(
    password: &str,
    method: HashMethod,
    encoded: &str,
) -> Result<bool, CryptoError> {
    match method {
        HashMethod::Pbkdf2Sha256 => verify_pbkdf2(password, encoded),
    }
}

fn verify_pbkdf2(password: &str, encoded: &str) -> Result<bool, CryptoError> {
    let parts: Vec<&str> = encoded.split('$').collect();
    let [iterations, salt, expected] = parts.as_slice() else {
        return Err(CryptoError::MalformedHash(format!(
            "expected 3 fields for {}, found {}",
            HashMethod::Pbkdf2Sha256.as_str(),
            parts.len()
        )));
    };

    let iterations: u32 = iterations
        .parse()
        .map_err(|_| CryptoError::MalformedHash("iteration count".into()))?;
    // Bounded so a tampered row cannot stall logon
    if iterations == 0 || iterations > MAX_PBKDF2_ITERATIONS {
        return Err(CryptoError::InvalidIterations(iterations));
    }
    let salt = decode(salt, "salt")?;
    let expected = decode(expected, "digest")?;
    Ok(PasswordDigest::pbkdf2(password, &salt, iterations).matches(&expected))
}

/// Random alphanumeric secret for the first administrator account.
pub fn generate_bootstrap_secret() -> Zeroizing<String> {
    let secret: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOOTSTRAP_SECRET_LENGTH)
        .map(char::from)
        .collect();
    Zeroizing::new(secret)
}

fn decode(field: &str, what: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(field)
        .map_err(|_| CryptoError::MalformedHash(format!("{what} is not valid base64")))
}
