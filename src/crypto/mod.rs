pub mod keys;
pub mod password;

pub use keys::*;
pub use password::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Hash iteration count out of range: {0}")]
    InvalidIterations(u32),
}
