//! Session token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use gatehouse_entity::session::SessionToken;

/// Random bytes per token.
pub const TOKEN_BYTES: usize = 32;

/// Generates a cookie-safe token from 32 random bytes.
pub fn generate_token() -> SessionToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    SessionToken::new(URL_SAFE_NO_PAD.encode(bytes))
}
