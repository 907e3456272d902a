//! Request body builders and token helpers.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

use crate::setup::TEST_JWT_SECRET;

/// Bearer token accepted by the default (fixed-identity) context.
pub const ANY_TOKEN: &str = "any-token";

pub const APP: &str = "webapp";

pub fn start_body(user: &str, time: &str) -> Value {
    json!({
        "user": user,
        "time": time,
        "status": "active",
        "app": APP,
    })
}

pub fn op_body(user: &str, session_id: &str, time: &str) -> Value {
    json!({
        "user": user,
        "session_id": session_id,
        "time": time,
        "app": APP,
    })
}

pub fn track_body(user: &str, page: &str, timespent: i64) -> Value {
    json!({
        "user": user,
        "page": page,
        "timespent": timespent,
        "app": APP,
    })
}

pub fn scope_body(user: &str) -> Value {
    json!({ "app": APP, "user": user })
}

/// Sign an HS256 token against the suite secret.
pub fn signed_token(claims: &Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token signing")
}

/// Sign a token with the wrong key; verification must reject it.
pub fn forged_token(claims: &Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .expect("token signing")
}
