//! Get trait for fetching single records.

use async_trait::async_trait;

use crate::client::QuetzClient;
use crate::error::Result;

/// Fetch a single record by ID.
///
/// # Example
///
/// ```ignore
/// use quetz_client::{Get, QuetzClient, UserRole};
///
/// let client = QuetzClient::from_env()?;
/// let role = UserRole::get(&client, "alice".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this record (e.g. a channel name or username).
    type Id: Send;

    /// Fetch the record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is not found, the request fails or the
    /// body does not decode.
    async fn get(client: &QuetzClient, id: Self::Id) -> Result<Self>;
}
