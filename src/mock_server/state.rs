//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Quetz server.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use axum::http::HeaderMap;
use tokio::sync::RwLock;

use crate::{Channel, ChannelMember, Package, Role, User, API_KEY_HEADER};

/// A file received by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub channel: String,
    pub filename: String,
    pub sha256: String,
    pub size: usize,
    pub force: bool,
}

/// Shared state for the mock server.
///
/// Collections are ordered so paginated listings are deterministic.
#[derive(Debug, Default)]
pub struct MockState {
    /// Channels indexed by name.
    pub channels: BTreeMap<String, Channel>,

    /// Users indexed by username.
    pub users: BTreeMap<String, User>,

    /// Global role per username.
    pub roles: HashMap<String, Option<Role>>,

    /// Channel members: channel name -> username -> role.
    pub members: BTreeMap<String, BTreeMap<String, Option<Role>>>,

    /// Packages per channel, indexed by package name.
    pub packages: BTreeMap<String, BTreeMap<String, Package>>,

    /// Every accepted upload, in arrival order.
    pub uploads: Vec<UploadedFile>,

    /// Accepted API keys. When both this and `passwords` are empty, every
    /// request is authorized.
    pub api_keys: HashSet<String>,

    /// Passwords for the login endpoint, by username.
    pub passwords: HashMap<String, String>,

    /// Session tokens handed out by the login endpoint.
    pub tokens: HashMap<String, String>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a channel to the state.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.insert(channel.name.clone(), channel);
        self
    }

    /// Add a user with an optional global role.
    pub fn with_user(mut self, user: User, role: Option<Role>) -> Self {
        self.roles.insert(user.username.clone(), role);
        self.users.insert(user.username.clone(), user);
        self
    }

    /// Add a channel membership.
    pub fn with_member(mut self, channel: &str, username: &str, role: Option<Role>) -> Self {
        self.set_member(channel, username, role);
        self
    }

    /// Add a package to a channel.
    pub fn with_package(mut self, channel: &str, package: Package) -> Self {
        self.packages
            .entry(channel.to_string())
            .or_default()
            .insert(package.name.clone(), package);
        self
    }

    /// Require `X-API-Key: <key>` (or a login token) on every request.
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_keys.insert(key.to_string());
        self
    }

    /// Allow `username` to log in with `password`.
    pub fn with_password(mut self, username: &str, password: &str) -> Self {
        self.passwords
            .insert(username.to_string(), password.to_string());
        self
    }

    /// Check the credential headers of a request.
    pub fn is_authorized(&self, headers: &HeaderMap) -> bool {
        if self.api_keys.is_empty() && self.passwords.is_empty() {
            return true;
        }

        let api_key = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        if api_key.is_some_and(|k| self.api_keys.contains(k)) {
            return true;
        }

        headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| self.tokens.contains_key(token))
    }

    /// Exchange a username and password for a token.
    pub fn login(&mut self, username: &str, password: &str) -> Option<String> {
        if self.passwords.get(username).map(String::as_str) != Some(password) {
            return None;
        }
        let token = format!("token-{username}-{}", self.tokens.len());
        self.tokens.insert(token.clone(), username.to_string());
        Some(token)
    }

    /// List the members of a channel, or `None` if it doesn't exist.
    pub fn list_members(&self, channel: &str) -> Option<Vec<ChannelMember>> {
        if !self.channels.contains_key(channel) {
            return None;
        }
        let members = self
            .members
            .get(channel)
            .into_iter()
            .flatten()
            .filter_map(|(username, role)| {
                self.users.get(username).map(|user| ChannelMember {
                    channel: None,
                    user: user.clone(),
                    role: *role,
                })
            })
            .collect();
        Some(members)
    }

    /// Add or update a channel membership.
    pub fn set_member(&mut self, channel: &str, username: &str, role: Option<Role>) {
        self.members
            .entry(channel.to_string())
            .or_default()
            .insert(username.to_string(), role);
    }

    /// Remove a channel membership. Returns false if there was none.
    pub fn remove_member(&mut self, channel: &str, username: &str) -> bool {
        self.members
            .get_mut(channel)
            .and_then(|m| m.remove(username))
            .is_some()
    }

    /// List the packages of a channel, or `None` if it doesn't exist.
    pub fn list_packages(&self, channel: &str) -> Option<Vec<Package>> {
        if !self.channels.contains_key(channel) {
            return None;
        }
        Some(
            self.packages
                .get(channel)
                .map(|p| p.values().cloned().collect())
                .unwrap_or_default(),
        )
    }

    /// Delete a channel with its members and packages.
    pub fn delete_channel(&mut self, name: &str) -> bool {
        self.members.remove(name);
        self.packages.remove(name);
        self.channels.remove(name).is_some()
    }

    /// Record an upload and register the package it contains.
    ///
    /// Conda file names look like `name-version-build.tar.bz2`.
    pub fn record_upload(&mut self, upload: UploadedFile) {
        let stem = upload
            .filename
            .trim_end_matches(".tar.bz2")
            .trim_end_matches(".conda");
        let mut parts = stem.rsplitn(3, '-');
        let _build = parts.next();
        let version = parts.next().map(str::to_string);
        let name = parts.next().unwrap_or(stem).to_string();

        let packages = self.packages.entry(upload.channel.clone()).or_default();
        let package = packages.entry(name.clone()).or_insert_with(|| Package {
            name,
            url: None,
            current_version: None,
            summary: None,
            description: None,
            platforms: vec![],
            channel: None,
        });
        package.current_version = version;

        self.uploads.push(upload);
    }

    /// Returns true if `filename` was already uploaded to `channel`.
    pub fn has_upload(&self, channel: &str, filename: &str) -> bool {
        self.uploads
            .iter()
            .any(|u| u.channel == channel && u.filename == filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_state_members_skip_unknown_users() {
        let state = MockState::new()
            .with_channel(Fixtures::channel("a"))
            .with_user(Fixtures::user("alice"), None)
            .with_member("a", "alice", Some(Role::Owner))
            .with_member("a", "ghost", Some(Role::Member));

        let members = state.list_members("a").unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user.username, "alice");
        assert!(state.list_members("missing").is_none());
    }

    #[test]
    fn test_state_record_upload_registers_package() {
        let mut state = MockState::new().with_channel(Fixtures::channel("a"));
        state.record_upload(UploadedFile {
            channel: "a".to_string(),
            filename: "xtensor-0.16.1-0.tar.bz2".to_string(),
            sha256: "00".to_string(),
            size: 1,
            force: false,
        });

        let packages = state.list_packages("a").unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "xtensor");
        assert_eq!(packages[0].current_version.as_deref(), Some("0.16.1"));
        assert!(state.has_upload("a", "xtensor-0.16.1-0.tar.bz2"));
    }

    #[test]
    fn test_state_authorization() {
        let mut state = MockState::new()
            .with_api_key("key")
            .with_password("alice", "secret");

        let mut headers = HeaderMap::new();
        assert!(!state.is_authorized(&headers));

        headers.insert("x-api-key", "key".parse().unwrap());
        assert!(state.is_authorized(&headers));

        assert!(state.login("alice", "wrong").is_none());
        let token = state.login("alice", "secret").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        assert!(state.is_authorized(&headers));
    }

    #[test]
    fn test_open_state_authorizes_everything() {
        assert!(MockState::new().is_authorized(&HeaderMap::new()));
    }
}
