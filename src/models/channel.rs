//! Channel model and operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::QuetzClient;
use crate::decode::{decode_response, Record};
use crate::error::Result;
use crate::pagination::Pager;
use crate::traits::{Get, List};

/// A Quetz channel: a named package repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    /// Unique channel name.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the channel is hidden from anonymous users.
    pub private: bool,

    /// Storage quota in bytes.
    #[serde(default)]
    pub size_limit: Option<u64>,

    /// Cache time-to-live for proxied packages, in seconds.
    #[serde(default)]
    pub ttl: Option<u64>,

    /// Upstream channel for mirror or proxy channels.
    #[serde(default)]
    pub mirror_channel_url: Option<String>,

    /// How the upstream channel is followed.
    #[serde(default)]
    pub mirror_mode: Option<MirrorMode>,

    #[serde(default)]
    pub members_count: Option<u64>,

    /// Total size of the channel's packages in bytes.
    #[serde(default)]
    pub size: Option<u64>,
}

/// How a channel follows its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorMode {
    /// Packages are fetched from upstream on demand.
    Proxy,
    /// Packages are synchronised from upstream.
    Mirror,
}

impl Channel {
    /// Returns true for proxy and mirror channels.
    pub fn is_mirror(&self) -> bool {
        self.mirror_channel_url.is_some() || self.mirror_mode.is_some()
    }
}

impl Record for Channel {
    const KIND: &'static str = "channel";
}

#[async_trait]
impl Get for Channel {
    type Id = String; // Channel name

    #[tracing::instrument(skip(client))]
    async fn get(client: &QuetzClient, name: String) -> Result<Self> {
        let path = format!("api/channels/{}", urlencoding::encode(&name));
        let response = client.get(&path).await?;
        decode_response(response).await
    }
}

impl List for Channel {
    type Scope = ();

    fn list_path(_: &()) -> String {
        "api/channels".to_string()
    }
}

#[derive(Serialize)]
struct NewChannel<'a> {
    name: &'a str,
}

/// Lazily list every channel visible to the session.
///
/// # Errors
///
/// Returns an error if `page_size` is zero.
pub fn list_channels(client: &QuetzClient, page_size: u32) -> Result<Pager<Channel>> {
    Channel::list(client, &(), page_size)
}

/// Create a channel.
///
/// Sends `POST /api/channels` with body `{"name": <name>}`.
#[tracing::instrument(skip(client))]
pub async fn create_channel(client: &QuetzClient, name: &str) -> Result<()> {
    client.post("api/channels", &NewChannel { name }).await?;
    Ok(())
}

/// Delete a channel.
#[tracing::instrument(skip(client))]
pub async fn delete_channel(client: &QuetzClient, name: &str) -> Result<()> {
    let path = format!("api/channels/{}", urlencoding::encode(name));
    client.delete(&path).await?;
    Ok(())
}
