// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed OAuth `state` parameter.
//!
//! The state binds an authorization callback to the browser session that
//! started it: `base64url(session_id|hex(hmac_sha256(key, session_id)))`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

fn signature(session_id: &str, key: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(session_id.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Sign a session ID into an opaque `state` value.
pub fn sign(session_id: &str, key: &[u8]) -> Option<String> {
    let signed = format!("{}|{}", session_id, signature(session_id, key)?);
    Some(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify a `state` value and return the session ID it was issued for.
pub fn verify(state: &str, key: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    let (session_id, signature_hex) = state_str.split_once('|')?;
    let expected = signature(session_id, key)?;

    if !bool::from(expected.as_bytes().ct_eq(signature_hex.as_bytes())) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(session_id.to_string())
}

/// Whether `state` was issued for `session_id`.
pub fn matches_session(state: &str, session_id: &str, key: &[u8]) -> bool {
    verify(state, key).is_some_and(|signed_for| {
        bool::from(signed_for.as_bytes().ct_eq(session_id.as_bytes()))
    })
}
