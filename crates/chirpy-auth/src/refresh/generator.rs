//! Refresh token generation.

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::AuthError;

/// Number of random bytes behind each refresh token.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Generates a refresh token: 32 bytes from the OS random source, hex
/// encoded to 64 lowercase characters.
///
/// A failing random source is reported instead of yielding a weak token.
pub fn generate_refresh_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::Entropy(e.to_string()))?;
    Ok(hex::encode(bytes))
}
