//! Typed record decoding.
//!
//! Every record type declares its schema through its serde derive:
//! non-`Option` fields without a default are required, unknown keys are
//! ignored. Decoding either yields a complete record or a
//! [`QuetzError::Decode`] naming the record kind.

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{QuetzError, Result};

/// A record type returned by the Quetz API.
pub trait Record: DeserializeOwned {
    /// Human-readable record kind used in decode errors.
    const KIND: &'static str;
}

/// Decode a raw JSON value into a record.
pub fn decode<T: Record>(raw: Value) -> Result<T> {
    serde_json::from_value(raw).map_err(|source| QuetzError::Decode {
        record: T::KIND,
        source,
    })
}

/// Read a response body and decode it into a record.
pub async fn decode_response<T: Record>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    let raw: Value = serde_json::from_slice(&bytes).map_err(|source| QuetzError::Decode {
        record: T::KIND,
        source,
    })?;
    decode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Channel, ChannelMember, Role, User, UserRole};
    use serde_json::json;

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let channel: Channel = decode(json!({
            "name": "conda-forge",
            "private": false,
            "some_future_field": {"nested": true}
        }))
        .unwrap();
        assert_eq!(channel.name, "conda-forge");
        assert!(!channel.private);
        assert_eq!(channel.description, None);
    }

    #[test]
    fn test_decode_missing_required_field() {
        let err = decode::<Channel>(json!({"description": "no name"})).unwrap_err();
        match err {
            QuetzError::Decode { record, source } => {
                assert_eq!(record, "channel");
                assert!(source.to_string().contains("name"));
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_wrong_type_is_error() {
        let err = decode::<User>(json!({"id": "u1", "username": 42})).unwrap_err();
        assert!(matches!(err, QuetzError::Decode { record: "user", .. }));
    }

    #[test]
    fn test_decode_nested_records() {
        let member: ChannelMember = decode(json!({
            "user": {
                "id": "0c5f",
                "username": "alice",
                "profile": {"name": "Alice", "avatar_url": "https://example.com/a.png"}
            },
            "role": "maintainer"
        }))
        .unwrap();
        assert_eq!(member.user.username, "alice");
        assert_eq!(member.role, Some(Role::Maintainer));
        assert_eq!(
            member.user.profile.and_then(|p| p.name).as_deref(),
            Some("Alice")
        );
    }

    #[test]
    fn test_decode_nested_failure_is_atomic() {
        let err = decode::<ChannelMember>(json!({
            "user": {"username": "alice"},
            "role": "member"
        }))
        .unwrap_err();
        assert!(matches!(err, QuetzError::Decode { record: "channel member", .. }));
    }

    #[test]
    fn test_decode_null_role() {
        let role: UserRole = decode(json!({"role": null})).unwrap();
        assert_eq!(role.role, None);
    }

    #[test]
    fn test_decode_rejects_unknown_role() {
        let err = decode::<UserRole>(json!({"role": "admin"})).unwrap_err();
        assert!(matches!(err, QuetzError::Decode { .. }));
    }
}
