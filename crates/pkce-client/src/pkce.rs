//! PKCE secret generation and challenge derivation per RFC 7636
//!
//! The verifier is a client-held secret; the challenge is its one-way
//! derivation sent in the authorization URL. The authorization server
//! recomputes the challenge from the verifier presented at token exchange,
//! proving both requests came from the same party.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;
use sha2::{Digest, Sha256};

/// Generate a cryptographically random secret string.
///
/// 32 random bytes rendered as URL-safe base64 without padding: 43
/// characters carrying 256 bits of entropy. Used for both the code
/// verifier and the default CSRF state token. RFC 7636 requires verifiers
/// of 43-128 characters; this is the minimum length.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Derive the S256 code challenge from a verifier.
///
/// `challenge = BASE64URL(SHA256(verifier))`, padding stripped. This
/// transform must be byte-for-byte reproducible: it is the cryptographic
/// binding between the authorization request and the token exchange.
pub fn derive_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}
