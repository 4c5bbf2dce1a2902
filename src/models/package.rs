//! Package model and operations.

use serde::{Deserialize, Serialize};

use crate::client::QuetzClient;
use crate::decode::Record;
use crate::error::Result;
use crate::pagination::{paginate, Pager};
use crate::traits::List;

/// A package in a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Package {
    pub name: String,

    /// Project homepage.
    #[serde(default)]
    pub url: Option<String>,

    /// Latest uploaded version.
    #[serde(default)]
    pub current_version: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Platforms the package has builds for (e.g. "linux-64", "noarch").
    #[serde(default)]
    pub platforms: Vec<String>,

    /// Channel the package lives in.
    ///
    /// Filled in by [`list_packages`] when the server omits it.
    #[serde(default, alias = "channel_name", skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl Record for Package {
    const KIND: &'static str = "package";
}

impl List for Package {
    type Scope = str; // Channel name

    fn list_path(channel: &str) -> String {
        format!("api/channels/{}/packages", urlencoding::encode(channel))
    }

    fn list(client: &QuetzClient, channel: &str, page_size: u32) -> Result<Pager<Self>> {
        let owned = channel.to_string();
        Ok(
            paginate::<Self>(client, Self::list_path(channel), Vec::new(), page_size)?.map_items(
                move |mut package: Package| {
                    package.channel.get_or_insert_with(|| owned.clone());
                    package
                },
            ),
        )
    }
}

/// Lazily list the packages of a channel.
///
/// # Errors
///
/// Returns an error if `page_size` is zero.
pub fn list_packages(
    client: &QuetzClient,
    channel: &str,
    page_size: u32,
) -> Result<Pager<Package>> {
    Package::list(client, channel, page_size)
}
