//! Quetz API client library.
//!
//! A Rust library for the Quetz package server REST API: channels,
//! packages, users, roles and channel memberships. List endpoints are
//! exposed as lazy [`Pager`] streams that fetch one page at a time.
//!
//! # Quick Start
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use quetz_client::{list_channels, get_role, set_role, QuetzClient, Role};
//!
//! #[tokio::main]
//! async fn main() -> quetz_client::Result<()> {
//!     // Authenticate with an API key
//!     let client = QuetzClient::from_api_key("https://quetz.example.com", "my-key")?;
//!
//!     // Walk every channel, 50 per request
//!     let mut channels = list_channels(&client, 50)?;
//!     while let Some(channel) = channels.try_next().await? {
//!         println!("{} (private: {})", channel.name, channel.private);
//!     }
//!
//!     // Read and change a user's role
//!     let role = get_role(&client, "alice").await?;
//!     println!("alice: {:?}", role.role);
//!     set_role(&client, "alice", Some(Role::Maintainer)).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`QuetzClient`] - the authenticated session
//! - [`decode`] - typed record decoding
//! - [`paginate`] / [`Pager`] - lazy offset pagination
//! - [`Get`] and [`List`] - traits implemented by record types
//!
//! # Configuration
//!
//! [`QuetzClient::from_env`] reads:
//!
//! - `QUETZ_API_KEY` (required) - Your Quetz API key
//! - `QUETZ_SERVER_URL` (optional) - Base URL (defaults to `http://localhost:8000`)

pub mod cli;
mod client;
pub mod decode;
mod error;
mod models;
mod output;
mod pagination;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{AuthScheme, QuetzClient, API_KEY_HEADER};
pub use decode::Record;
pub use error::{QuetzError, Result};
pub use output::PrettyPrint;
pub use pagination::{
    fetch_page, paginate, Page, Pager, PaginationParams, QueryParams, DEFAULT_PAGE_SIZE,
};

// Re-export traits
pub use traits::{Get, List};

// Re-export models
pub use models::{
    Channel, ChannelMember, MirrorMode, Package, Profile, Role, User, UserRole,
};

// Re-export endpoint functions
pub use models::{create_channel, delete_channel, list_channels};
pub use models::{delete_channel_member, list_channel_members, set_channel_member};
pub use models::{get_role, set_role};
pub use models::{list_packages, list_users};
pub use models::{sha256_hex, upload_file};
