//! Decoding of the opaque bearer credential into an [`Identity`].
//!
//! The credential is a three-segment `header.payload.signature` string. Only the payload is
//! read; the signature is never checked here because the backend stays the authority on
//! every request.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::identity::{Identity, Role};

/// Reasons a credential cannot be turned into an identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCredential {
    #[error("credential must have three dot-separated segments, found {0}")]
    SegmentCount(usize),
    #[error("credential payload is not base64url")]
    PayloadEncoding,
    #[error("credential payload is not a JSON object")]
    PayloadFormat,
    #[error("credential is missing the `{0}` claim")]
    MissingClaim(&'static str),
    #[error("credential expired at {0}")]
    Expired(DateTime<Utc>),
}

/// Claims carried by a credential after structural validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialClaims {
    identity: Identity,
    expires_at: Option<DateTime<Utc>>,
}

impl CredentialClaims {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }

    pub fn into_identity(self) -> Identity {
        self.identity
    }

    /// Yield the identity only while the credential is still within its lifetime.
    pub fn into_fresh_identity(self, now: DateTime<Utc>) -> Result<Identity, InvalidCredential> {
        match self.expires_at {
            Some(exp) if exp <= now => Err(InvalidCredential::Expired(exp)),
            _ => Ok(self.identity),
        }
    }
}

pub fn decode(raw: &str) -> Result<Identity, InvalidCredential> {
    decode_claims(raw).map(CredentialClaims::into_identity)
}

pub fn decode_claims(raw: &str) -> Result<CredentialClaims, InvalidCredential> {
    let segments: Vec<&str> = raw.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(InvalidCredential::SegmentCount(segments.len()));
    }

    let payload = decode_segment(segments[1])?;
    let value: Value =
        serde_json::from_slice(&payload).map_err(|_| InvalidCredential::PayloadFormat)?;
    let claims = value.as_object().ok_or(InvalidCredential::PayloadFormat)?;

    let id = id_claim(claims).ok_or(InvalidCredential::MissingClaim("id"))?;
    let role = string_claim(claims, "role")
        .map(Role::from_claim)
        .ok_or(InvalidCredential::MissingClaim("role"))?;
    let email = string_claim(claims, "email").map(str::to_string);
    let display_name = display_name(claims, email.as_deref(), &id);

    let expires_at = match claims.get("exp") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let seconds = value
                .as_i64()
                .or_else(|| fractional_seconds(value))
                .ok_or(InvalidCredential::PayloadFormat)?;
            Some(DateTime::from_timestamp(seconds, 0).ok_or(InvalidCredential::PayloadFormat)?)
        }
    };

    Ok(CredentialClaims {
        identity: Identity::new(id, display_name, email, role),
        expires_at,
    })
}

/// Build an unsigned credential around `claims`. Used by stub backends and fixtures.
pub fn encode_unsigned(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.unsigned")
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, InvalidCredential> {
    let unpadded = segment.trim_end_matches('=');
    if unpadded.is_empty() {
        return Err(InvalidCredential::PayloadEncoding);
    }
    URL_SAFE_NO_PAD
        .decode(unpadded)
        .map_err(|_| InvalidCredential::PayloadEncoding)
}

/// NumericDate allows fractions; the credential expires at the whole second.
fn fractional_seconds(value: &Value) -> Option<i64> {
    value
        .as_f64()
        .filter(|seconds| seconds.is_finite())
        .map(|seconds| seconds.floor() as i64)
}

fn id_claim(claims: &Map<String, Value>) -> Option<String> {
    ["id", "userId"].iter().find_map(|key| match claims.get(*key) {
        Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

fn string_claim<'a>(claims: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    claims
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn display_name(claims: &Map<String, Value>, email: Option<&str>, id: &str) -> String {
    if let Some(user_name) = string_claim(claims, "userName") {
        return user_name.to_string();
    }

    let full_name = [
        string_claim(claims, "firstName"),
        string_claim(claims, "lastName"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");
    if !full_name.is_empty() {
        return full_name;
    }

    email.unwrap_or(id).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn decodes_identity_from_user_id_claim() {
        let token = encode_unsigned(&json!({
            "userId": 42,
            "firstName": "Ayesha",
            "lastName": "Khan",
            "email": "ayesha@example.com",
            "role": "RECRUITER"
        }));

        let identity = decode(&token).expect("credential decodes");
        assert_eq!(identity.id().as_str(), "42");
        assert_eq!(identity.display_name(), "Ayesha Khan");
        assert_eq!(identity.email(), Some("ayesha@example.com"));
        assert_eq!(identity.role(), Role::Recruiter);
    }

    #[test]
    fn prefers_user_name_for_display() {
        let token = encode_unsigned(&json!({
            "id": "u-7",
            "userName": "bilal",
            "firstName": "Bilal",
            "role": "INTERVIEWER"
        }));
        let identity = decode(&token).expect("credential decodes");
        assert_eq!(identity.display_name(), "bilal");
        assert_eq!(identity.email(), None);
    }

    #[test]
    fn accepts_padded_payload_segments() {
        let payload = base64::engine::general_purpose::URL_SAFE
            .encode(json!({"id": "1", "role": "ADMIN"}).to_string());
        let identity = decode(&token_with_payload(&payload)).expect("padded payload decodes");
        assert_eq!(identity.role(), Role::Admin);
    }

    #[test]
    fn rejects_wrong_segment_counts() {
        assert_eq!(decode("abc"), Err(InvalidCredential::SegmentCount(1)));
        assert_eq!(decode("a.b"), Err(InvalidCredential::SegmentCount(2)));
        assert_eq!(decode("a.b.c.d"), Err(InvalidCredential::SegmentCount(4)));
    }

    #[test]
    fn rejects_non_base64url_payload() {
        assert_eq!(
            decode(&token_with_payload("not*base64!")),
            Err(InvalidCredential::PayloadEncoding)
        );
        assert_eq!(
            decode(&token_with_payload("")),
            Err(InvalidCredential::PayloadEncoding)
        );
    }

    #[test]
    fn rejects_payloads_that_are_not_objects() {
        let payload = URL_SAFE_NO_PAD.encode("[1,2,3]");
        assert_eq!(
            decode(&token_with_payload(&payload)),
            Err(InvalidCredential::PayloadFormat)
        );
        let payload = URL_SAFE_NO_PAD.encode("{not json");
        assert_eq!(
            decode(&token_with_payload(&payload)),
            Err(InvalidCredential::PayloadFormat)
        );
    }

    #[test]
    fn requires_id_and_role_claims() {
        let missing_role = encode_unsigned(&json!({"id": "9"}));
        assert_eq!(
            decode(&missing_role),
            Err(InvalidCredential::MissingClaim("role"))
        );

        let missing_id = encode_unsigned(&json!({"role": "CANDIDATE", "id": "  "}));
        assert_eq!(decode(&missing_id), Err(InvalidCredential::MissingClaim("id")));
    }

    #[test]
    fn unknown_roles_still_decode() {
        let token = encode_unsigned(&json!({"id": "3", "role": "AUDITOR"}));
        let identity = decode(&token).expect("credential decodes");
        assert_eq!(identity.role(), Role::Unknown);
    }

    #[test]
    fn expiry_is_checked_against_supplied_clock() {
        let token = encode_unsigned(&json!({"id": "5", "role": "CANDIDATE", "exp": 1_700_000_000}));
        let claims = decode_claims(&token).expect("claims decode");
        let expiry = claims.expires_at().expect("expiry present");

        let before = expiry - chrono::Duration::seconds(1);
        assert!(!claims.is_expired_at(before));
        assert!(claims.clone().into_fresh_identity(before).is_ok());
        assert_eq!(
            claims.into_fresh_identity(expiry),
            Err(InvalidCredential::Expired(expiry))
        );
    }

    #[test]
    fn fractional_expiry_rounds_down_to_the_second() {
        let token = encode_unsigned(&json!({"id": "5", "role": "CANDIDATE", "exp": 1_700_000_000.75}));
        let claims = decode_claims(&token).expect("fractional exp decodes");
        let expiry = claims.expires_at().expect("expiry present");
        assert_eq!(expiry.timestamp(), 1_700_000_000);
        assert!(claims.is_expired_at(expiry));

        let token = encode_unsigned(&json!({"id": "5", "role": "CANDIDATE", "exp": "soon"}));
        assert_eq!(
            decode_claims(&token).map(|_| ()),
            Err(InvalidCredential::PayloadFormat)
        );
    }
}
