//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Channel, ChannelMember, Package, User, UserRole};

/// Trait for human-readable key-value output.
///
/// Implemented by record types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Channel {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.name.len().max(30));

        let mut lines = vec![
            format!("Channel: {}", self.name),
            divider,
            format!(
                "Visibility:     {}",
                if self.private { "private" } else { "public" }
            ),
        ];

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        if let Some(ref upstream) = self.mirror_channel_url {
            let mode = self
                .mirror_mode
                .map(|m| format!("{m:?}").to_lowercase())
                .unwrap_or_else(|| "mirror".to_string());
            lines.push(format!("Upstream:       {} ({})", upstream, mode));
        }

        if let Some(count) = self.members_count {
            lines.push(format!("Members:        {}", count));
        }

        if let Some(size) = self.size {
            lines.push(format!("Size:           {} bytes", size));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.username.len().max(30));

        let mut lines = vec![
            format!("User: {}", self.username),
            divider,
            format!("ID:             {}", self.id),
        ];

        if let Some(name) = self.profile.as_ref().and_then(|p| p.name.as_deref()) {
            lines.push(format!("Name:           {}", name));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for ChannelMember {
    fn pretty_print(&self) -> String {
        let role = self.role.map(|r| r.to_string()).unwrap_or_else(|| "none".to_string());
        match self.channel {
            Some(ref channel) => format!("{} in {}: {}", self.user.username, channel, role),
            None => format!("{}: {}", self.user.username, role),
        }
    }
}

impl PrettyPrint for Package {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.name.len().max(30));

        let mut lines = vec![format!("Package: {}", self.name), divider];

        if let Some(ref channel) = self.channel {
            lines.push(format!("Channel:        {}", channel));
        }

        if let Some(ref version) = self.current_version {
            lines.push(format!("Version:        {}", version));
        }

        if let Some(ref summary) = self.summary {
            lines.push(format!("Summary:        {}", summary));
        }

        if let Some(ref url) = self.url {
            lines.push(format!("URL:            {}", url));
        }

        if !self.platforms.is_empty() {
            lines.push(format!("Platforms:      {}", self.platforms.join(", ")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for UserRole {
    fn pretty_print(&self) -> String {
        match self.role {
            Some(role) => format!("Role: {}", role),
            None => "Role: none".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_channel_pretty_print_format() {
        let channel: Channel = serde_json::from_value(serde_json::json!({
            "name": "conda-forge",
            "description": "Community packages",
            "private": true,
            "mirror_channel_url": "https://conda.anaconda.org/conda-forge",
            "mirror_mode": "proxy"
        }))
        .unwrap();

        let output = channel.pretty_print();
        assert!(output.starts_with("Channel: conda-forge"));
        assert!(output.contains("private"));
        assert!(output.contains("(proxy)"));
    }

    #[test]
    fn test_role_pretty_print_none() {
        assert_eq!(UserRole { role: None }.pretty_print(), "Role: none");
        assert_eq!(
            UserRole {
                role: Some(Role::Owner)
            }
            .pretty_print(),
            "Role: owner"
        );
    }
}
