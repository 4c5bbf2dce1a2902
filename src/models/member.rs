//! Channel membership model and operations.

use serde::{Deserialize, Serialize};

use crate::client::QuetzClient;
use crate::decode::Record;
use crate::error::Result;
use crate::models::{Role, User};
use crate::pagination::{paginate, Pager};
use crate::traits::List;

/// A user's membership in a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelMember {
    /// Channel the membership belongs to.
    ///
    /// Not sent by the server; filled in by [`list_channel_members`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    pub user: User,

    #[serde(default)]
    pub role: Option<Role>,
}

impl Record for ChannelMember {
    const KIND: &'static str = "channel member";
}

impl List for ChannelMember {
    type Scope = str; // Channel name

    fn list_path(channel: &str) -> String {
        format!("api/channels/{}/members", urlencoding::encode(channel))
    }

    fn list(client: &QuetzClient, channel: &str, page_size: u32) -> Result<Pager<Self>> {
        let owned = channel.to_string();
        Ok(
            paginate::<Self>(client, Self::list_path(channel), Vec::new(), page_size)?.map_items(
                move |mut member: ChannelMember| {
                    member.channel = Some(owned.clone());
                    member
                },
            ),
        )
    }
}

#[derive(Serialize)]
struct MemberBody<'a> {
    username: &'a str,
    role: Option<Role>,
}

#[derive(Serialize)]
struct MemberQuery<'a> {
    username: &'a str,
}

/// Lazily list the members of a channel.
///
/// # Errors
///
/// Returns an error if `page_size` is zero.
pub fn list_channel_members(
    client: &QuetzClient,
    channel: &str,
    page_size: u32,
) -> Result<Pager<ChannelMember>> {
    ChannelMember::list(client, channel, page_size)
}

/// Add a user to a channel or change their channel role.
///
/// Sends `POST /api/channels/{channel}/members` with body
/// `{"username": <username>, "role": <role-or-null>}`.
#[tracing::instrument(skip(client))]
pub async fn set_channel_member(
    client: &QuetzClient,
    channel: &str,
    username: &str,
    role: Option<Role>,
) -> Result<()> {
    client
        .post(
            &ChannelMember::list_path(channel),
            &MemberBody { username, role },
        )
        .await?;
    Ok(())
}

/// Remove a user from a channel.
///
/// Sends `DELETE /api/channels/{channel}/members?username=<username>`.
#[tracing::instrument(skip(client))]
pub async fn delete_channel_member(
    client: &QuetzClient,
    channel: &str,
    username: &str,
) -> Result<()> {
    client
        .delete_with_query(&ChannelMember::list_path(channel), &MemberQuery { username })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_body() {
        let body = serde_json::to_value(MemberBody {
            username: "user",
            role: None,
        })
        .unwrap();
        assert_eq!(body, json!({"username": "user", "role": null}));
    }

    #[test]
    fn test_member_path_encodes_channel() {
        assert_eq!(
            ChannelMember::list_path("my channel"),
            "api/channels/my%20channel/members"
        );
    }

    #[test]
    fn test_member_serialization_omits_unknown_channel() {
        let member: ChannelMember = serde_json::from_value(json!({
            "user": {"id": "1", "username": "bob"},
            "role": "owner"
        }))
        .unwrap();
        let value = serde_json::to_value(&member).unwrap();
        assert!(value.get("channel").is_none());
    }
}
