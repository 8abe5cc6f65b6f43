//! Password hashing with bcrypt.

use bcrypt::BcryptError;

/// bcrypt work factor for new hashes
pub const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, BCRYPT_COST)
}

/// Check a plaintext password against a stored hash
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is
/// malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(password, password_hash)
}
