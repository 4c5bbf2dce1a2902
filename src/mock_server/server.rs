//! Mock Quetz server.
//!
//! Provides an axum-based HTTP server that simulates the Quetz API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock Quetz server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    pub fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for channel in scenario.channels {
            state = state.with_channel(channel);
        }

        for (user, role) in scenario.users {
            state = state.with_user(user, role);
        }

        for (channel, username, role) in scenario.members {
            state = state.with_member(channel, username, role);
        }

        for (channel, package) in scenario.packages {
            state = state.with_package(channel, package);
        }

        state
    }

    /// Create the axum router with all routes.
    pub fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            .route("/api/login", post(handlers::login))
            // Channel routes
            .route(
                "/api/channels",
                get(handlers::list_channels).post(handlers::create_channel),
            )
            .route(
                "/api/channels/:channel",
                get(handlers::get_channel).delete(handlers::delete_channel),
            )
            .route(
                "/api/channels/:channel/members",
                get(handlers::list_members)
                    .post(handlers::set_member)
                    .delete(handlers::delete_member),
            )
            .route(
                "/api/channels/:channel/packages",
                get(handlers::list_packages),
            )
            .route(
                "/api/channels/:channel/upload/:filename",
                post(handlers::upload),
            )
            // User routes
            .route("/api/users", get(handlers::list_users))
            .route(
                "/api/users/:username/role",
                get(handlers::get_role).put(handlers::set_role),
            )
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
