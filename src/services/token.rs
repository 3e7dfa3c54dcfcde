//! Master token provisioning.
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand_core::RngCore;

use crate::domain::MasterToken;
use crate::services::{ConfigError, ConfigResult};

/// Random bytes behind a generated token.
pub const TOKEN_BYTES: usize = 30;
/// Length of a generated token: base64 of [`TOKEN_BYTES`], unpadded.
pub const TOKEN_LENGTH: usize = 40;

/// Generates a URL-safe token from `rng`. Fails instead of falling back when
/// the random source errors.
pub fn generate_token<R: RngCore + ?Sized>(rng: &mut R) -> ConfigResult<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(ConfigError::Randomness)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Returns the configured token, or a fresh one when it is empty.
///
/// A generated token is logged since the operator has no other way to learn it.
pub fn provision_token<R: RngCore + ?Sized>(
    configured: String,
    rng: &mut R,
) -> ConfigResult<MasterToken> {
    if let Ok(token) = MasterToken::try_new(configured) {
        return Ok(token);
    }

    let generated = MasterToken::generated(generate_token(rng)?);
    log::info!("Generated master token: {}", generated.as_str());
    Ok(generated)
}
