//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! quetz-client binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::Role;

/// Quetz package server command-line interface.
#[derive(Parser, Debug)]
#[command(name = "quetz-client", about = "Quetz package server CLI", version)]
pub struct Cli {
    #[command(flatten)]
    pub auth: AuthArgs,

    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Server and credential options.
#[derive(Args, Debug, Clone)]
pub struct AuthArgs {
    /// Base URL of the Quetz server.
    #[arg(
        long,
        global = true,
        env = "QUETZ_SERVER_URL",
        default_value = "http://localhost:8000"
    )]
    pub url: String,

    /// API key sent as `X-API-Key`.
    #[arg(long, global = true, env = "QUETZ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Username for a credential login (used when no API key is given).
    #[arg(long, global = true, env = "QUETZ_USERNAME")]
    pub username: Option<String>,

    /// Password for a credential login.
    #[arg(long, global = true, env = "QUETZ_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List entities, following pagination to the end.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Channel name (required for members and packages).
        #[arg(long)]
        channel: Option<String>,

        /// Number of items requested per page.
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Read or change a user's global role.
    Role {
        #[command(subcommand)]
        action: RoleAction,
    },

    /// Manage channel membership.
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Create or delete channels.
    Channel {
        #[command(subcommand)]
        action: ChannelAction,
    },

    /// Upload package files to a channel.
    Upload {
        /// Target channel.
        channel: String,

        /// Package files to upload.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Overwrite files that already exist on the server.
        #[arg(long)]
        force: bool,
    },
}

/// `role` subcommands.
#[derive(Subcommand, Debug)]
pub enum RoleAction {
    /// Show a user's role.
    Get { username: String },

    /// Set a user's role; omit `--role` to clear it.
    Set {
        username: String,

        #[arg(long)]
        role: Option<Role>,
    },
}

/// `member` subcommands.
#[derive(Subcommand, Debug)]
pub enum MemberAction {
    /// Add a user to a channel or change their channel role.
    Set {
        channel: String,
        username: String,

        #[arg(long)]
        role: Option<Role>,
    },

    /// Remove a user from a channel.
    Delete { channel: String, username: String },
}

/// `channel` subcommands.
#[derive(Subcommand, Debug)]
pub enum ChannelAction {
    /// Create a channel.
    Create { name: String },

    /// Delete a channel.
    Delete { name: String },
}

/// Entity types that can be listed.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// Channels visible to the session.
    #[value(alias = "channel")]
    Channels,
    /// Members of a channel.
    #[value(alias = "member")]
    Members,
    /// Users of the server.
    #[value(alias = "user")]
    Users,
    /// Packages of a channel.
    #[value(alias = "package")]
    Packages,
}
