//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use crate::{Channel, MirrorMode, Package, Profile, Role, User};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// The default data set the mock server starts with.
pub struct DefaultScenario {
    pub channels: Vec<Channel>,
    pub users: Vec<(User, Option<Role>)>,
    pub members: Vec<(&'static str, &'static str, Option<Role>)>,
    pub packages: Vec<(&'static str, Package)>,
}

impl Fixtures {
    // =========================================================================
    // Channel Fixtures
    // =========================================================================

    /// Create a public channel with required fields only.
    pub fn channel(name: &str) -> Channel {
        Channel {
            name: name.to_string(),
            description: None,
            private: false,
            size_limit: None,
            ttl: None,
            mirror_channel_url: None,
            mirror_mode: None,
            members_count: None,
            size: None,
        }
    }

    /// Create a private channel with a description.
    pub fn private_channel(name: &str, description: &str) -> Channel {
        let mut channel = Self::channel(name);
        channel.private = true;
        channel.description = Some(description.to_string());
        channel
    }

    /// Create a proxy channel for an upstream URL.
    pub fn proxy_channel(name: &str, upstream: &str) -> Channel {
        let mut channel = Self::channel(name);
        channel.mirror_channel_url = Some(upstream.to_string());
        channel.mirror_mode = Some(MirrorMode::Proxy);
        channel.ttl = Some(36000);
        channel
    }

    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Create a user whose ID is derived from the username.
    pub fn user(username: &str) -> User {
        User {
            id: format!("{:0>32}", hex_id(username)),
            username: username.to_string(),
            profile: Some(Profile {
                name: Some(capitalize(username)),
                avatar_url: None,
            }),
        }
    }

    // =========================================================================
    // Package Fixtures
    // =========================================================================

    /// Create a package at a given version.
    pub fn package(name: &str, version: &str) -> Package {
        Package {
            name: name.to_string(),
            url: Some(format!("https://github.com/example/{name}")),
            current_version: Some(version.to_string()),
            summary: Some(format!("The {name} package")),
            description: None,
            platforms: vec!["linux-64".to_string()],
            channel: None,
        }
    }

    /// The default scenario: four channels, three users, memberships in
    /// channel `a` and two packages in `channel1`.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            channels: vec![
                Self::channel("a"),
                Self::private_channel("b", "Internal builds"),
                Self::channel("channel1"),
                Self::proxy_channel("proxy", "https://conda.anaconda.org/conda-forge"),
            ],
            users: vec![
                (Self::user("alice"), Some(Role::Owner)),
                (Self::user("bob"), Some(Role::Member)),
                (Self::user("carol"), None),
            ],
            members: vec![
                ("a", "alice", Some(Role::Owner)),
                ("a", "bob", Some(Role::Member)),
            ],
            packages: vec![
                ("channel1", Self::package("xtensor", "0.16.1")),
                ("channel1", Self::package("xtl", "0.7.2")),
            ],
        }
    }
}

fn hex_id(username: &str) -> String {
    username.bytes().map(|b| format!("{b:02x}")).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
