//! Roles and role assignment.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::QuetzClient;
use crate::decode::{decode_response, Record};
use crate::error::{QuetzError, Result};
use crate::traits::Get;

/// Access level of a user, globally or within a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Maintainer,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Maintainer => "maintainer",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = QuetzError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "maintainer" => Ok(Self::Maintainer),
            "member" => Ok(Self::Member),
            other => Err(QuetzError::Config(format!(
                "unknown role '{other}': expected owner, maintainer or member"
            ))),
        }
    }
}

/// The global role of a user. `None` means the user has no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRole {
    pub role: Option<Role>,
}

impl Record for UserRole {
    const KIND: &'static str = "role";
}

#[async_trait]
impl Get for UserRole {
    type Id = String; // Username

    #[tracing::instrument(skip(client))]
    async fn get(client: &QuetzClient, username: String) -> Result<Self> {
        let response = client.get(&role_path(&username)).await?;
        decode_response(response).await
    }
}

fn role_path(username: &str) -> String {
    format!("api/users/{}/role", urlencoding::encode(username))
}

/// Fetch the global role of a user.
pub async fn get_role(client: &QuetzClient, username: &str) -> Result<UserRole> {
    UserRole::get(client, username.to_string()).await
}

/// Set or clear the global role of a user.
///
/// Sends `PUT /api/users/{username}/role` with body exactly
/// `{"role": <role-or-null>}`.
#[tracing::instrument(skip(client))]
pub async fn set_role(client: &QuetzClient, username: &str, role: Option<Role>) -> Result<()> {
    client.put(&role_path(username), &UserRole { role }).await?;
    Ok(())
}
