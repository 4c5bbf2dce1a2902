//! Mock Quetz server for E2E testing.
//!
//! An in-memory, stateful stand-in for the Quetz routes this crate
//! consumes. Unlike wiremock, which mocks per request, this server keeps
//! state across requests, so a test can create a channel, add a member and
//! list the result.
//!
//! # Example
//!
//! ```ignore
//! use futures::TryStreamExt;
//! use quetz_client::mock_server::MockServer;
//! use quetz_client::{list_channels, QuetzClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = QuetzClient::from_api_key(server.url(), "test-key").unwrap();
//!
//!     // Server comes with default fixtures
//!     let channels: Vec<_> = list_channels(&client, 2).unwrap().try_collect().await.unwrap();
//!     assert_eq!(channels.len(), 4);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::Fixtures;
pub use server::MockServer;
pub use state::{MockState, UploadedFile};
