//! # storerate-client - The Kit
//!
//! Everything that talks to the outside world on behalf of the dashboard.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storerate_client::{ApiClient, Dashboard, InMemoryRepository, flows};
//! use storerate_core::{LoginForm, MemorySessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), storerate_client::Error> {
//!     let api = ApiClient::new("http://localhost:5000/api");
//!     let mut sessions = MemorySessionStore::new();
//!
//!     let route = flows::login(&api, &LoginForm::new("admin@example.com", "Admin@1234"), &mut sessions).await?;
//!     println!("navigate to {route}");
//!
//!     let dashboard = Dashboard::new(InMemoryRepository::seeded());
//!     println!("{}", dashboard.stats().await?.to_text());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐                          ┌─────────────────────┐
//! │   Dashboard         │  UserRepository          │ InMemoryRepository  │
//! │   (add / rate /     │  StoreRepository   ───►  │ (EntityStore)       │
//! │    stats)           │  RatingRepository        ├─────────────────────┤
//! └─────────────────────┘                          │ HttpRepository      │
//!                                                  │  POST/GET /users    │
//! ┌─────────────────────┐   POST /auth/login       │  POST/GET /stores   │
//! │ flows::login/signup │ ───────────────────►     │  POST/GET /ratings  │
//! └─────────────────────┘   POST /auth/signup      └─────────────────────┘
//! ```

pub mod api;
pub mod dashboard;
pub mod flows;
pub mod http;
pub mod memory;
pub mod repository;

pub use api::{ApiClient, DEFAULT_API_URL, LoginResponse, LoginUser};
pub use dashboard::Dashboard;
pub use http::HttpRepository;
pub use memory::InMemoryRepository;
pub use repository::{RatingRepository, StoreRepository, UserRepository};

pub use storerate_core;

use storerate_core::{GateError, RatingInputError, SessionError, ValidationErrors};
use thiserror::Error;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from the client layer.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server answered with a non-success status.
    #[error("Server error {status}: {}", .message.as_deref().unwrap_or("(no message)"))]
    Server { status: u16, message: Option<String> },

    /// A form failed validation; nothing was sent.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// Login succeeded but the role is not one the application knows.
    #[error("{0}")]
    UnknownRole(#[from] GateError),

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    /// Strict rating parsing rejected the input.
    #[error("Invalid rating: {0}")]
    RatingInput(#[from] RatingInputError),

    /// The in-memory store lock was poisoned by a panicking writer.
    #[error("In-memory state is unavailable")]
    StatePoisoned,
}

impl Error {
    /// The single message to show the operator.
    ///
    /// Server failures use the body's `message` when there is one; other
    /// transport failures use `fallback` (e.g. `"Login failed"`).
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::UnknownRole(gate) => gate.user_message().to_string(),
            Self::Validation(errors) => errors.to_string(),
            Self::RatingInput(err) => err.to_string(),
            _ => fallback.to_string(),
        }
    }
}
