//! User model and operations.

use serde::{Deserialize, Serialize};

use crate::client::QuetzClient;
use crate::decode::Record;
use crate::error::Result;
use crate::pagination::Pager;
use crate::traits::List;

/// A Quetz user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned user ID.
    pub id: String,

    /// Login name, used to address the user in most endpoints.
    pub username: String,

    #[serde(default)]
    pub profile: Option<Profile>,
}

/// Profile details of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    /// Display name if set, otherwise the username.
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .unwrap_or(&self.username)
    }
}

impl Record for User {
    const KIND: &'static str = "user";
}

impl List for User {
    type Scope = ();

    fn list_path(_: &()) -> String {
        "api/users".to_string()
    }
}

/// Lazily list every user.
///
/// # Errors
///
/// Returns an error if `page_size` is zero.
pub fn list_users(client: &QuetzClient, page_size: u32) -> Result<Pager<User>> {
    User::list(client, &(), page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user: User = serde_json::from_value(json!({"id": "1", "username": "bob"})).unwrap();
        assert_eq!(user.display_name(), "bob");

        let user: User = serde_json::from_value(json!({
            "id": "2",
            "username": "alice",
            "profile": {"name": "Alice Liddell", "avatar_url": null}
        }))
        .unwrap();
        assert_eq!(user.display_name(), "Alice Liddell");
    }
}
