use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Work factor for newly hashed passwords. Verification reads the count
/// stored alongside each hash, so raising this never locks anyone out.
#[cfg(not(test))]
pub const PBKDF2_ITERATIONS: u32 = 600_000;
#[cfg(test)]
pub const PBKDF2_ITERATIONS: u32 = 1_000;

/// Ceiling for iteration counts read back from storage.
pub const MAX_PBKDF2_ITERATIONS: u32 = PBKDF2_ITERATIONS * 10;

pub const DIGEST_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;

/// Derived password digest, zeroed on drop
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct PasswordDigest {
    bytes: [u8; DIGEST_LENGTH],
}

impl PasswordDigest {
    /// Derive from password + salt using PBKDF2-HMAC-SHA256
    pub fn pbkdf2(password: &str, salt: &[u8], iterations: u32) -> Self {
        let mut bytes = [0u8; DIGEST_LENGTH];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut bytes);
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.bytes
    }

    /// Constant-time comparison against a stored digest
    pub fn matches(&self, expected: &[u8]) -> bool {
        self.bytes[..].ct_eq(expected).into()
    }
}

/// Generate a cryptographically random salt
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pbkdf2_is_deterministic() {
        let salt = [42u8; SALT_LENGTH];
        let d1 = PasswordDigest::pbkdf2("password", &salt, PBKDF2_ITERATIONS);
        let d2 = PasswordDigest::pbkdf2("password", &salt, PBKDF2_ITERATIONS);
        assert_eq!(d1.as_bytes(), d2.as_bytes());
    }

    #[test]
    fn different_passwords_produce_different_digests() {
        let salt = [42u8; SALT_LENGTH];
        let d1 = PasswordDigest::pbkdf2("password1", &salt, PBKDF2_ITERATIONS);
        let d2 = PasswordDigest::pbkdf2("password2", &salt, PBKDF2_ITERATIONS);
        assert_ne!(d1.as_bytes(), d2.as_bytes());
    }

    #[test]
    fn different_salts_produce_different_digests() {
        let d1 = PasswordDigest::pbkdf2("password", &[1u8; SALT_LENGTH], PBKDF2_ITERATIONS);
        let d2 = PasswordDigest::pbkdf2("password", &[2u8; SALT_LENGTH], PBKDF2_ITERATIONS);
        assert_ne!(d1.as_bytes(), d2.as_bytes());
    }

    #[test]
    fn iteration_count_changes_digest() {
        let salt = [7u8; SALT_LENGTH];
        let d1 = PasswordDigest::pbkdf2("password", &salt, 1_000);
        let d2 = PasswordDigest::pbkdf2("password", &salt, 1_001);
        assert_ne!(d1.as_bytes(), d2.as_bytes());
    }

    #[test]
    fn matches_rejects_wrong_length() {
        let digest = PasswordDigest::pbkdf2("password", &[0u8; SALT_LENGTH], PBKDF2_ITERATIONS);
        assert!(digest.matches(digest.as_bytes()));
        assert!(!digest.matches(&digest.as_bytes()[..16]));
    }

    #[test]
    fn generate_salt_is_random() {
        let s1 = generate_salt();
        let s2 = generate_salt();
        assert_ne!(s1, s2);
    }
}
