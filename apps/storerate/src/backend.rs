//! Backend selection and state persistence for the CLI.
//!
//! The memory backend reloads the entity store from a snapshot file at the
//! start of each command and writes it back after a mutation. A missing
//! file starts from the seed data.

use crate::cli::CliError;
use crate::config::{BackendKind, Config};
use crate::session_file::FileSessionStore;
use std::path::Path;
use storerate_client::{
    ApiClient, Error, HttpRepository, InMemoryRepository, RatingRepository, StoreRepository,
    UserRepository,
};
use storerate_core::formats::{decode_snapshot, encode_snapshot};
use storerate_core::seed;
use storerate_core::{
    EntityStore, NewStore, NewUser, Rating, RatingPolicy, SessionStore, Store, StoreId, User,
};
use tracing::{debug, info};

// =============================================================================
// STATE FILE
// =============================================================================

/// Load the entity store from `path`, or build the seeded store if the file
/// does not exist yet.
pub fn load_or_seed(path: &Path, policy: RatingPolicy) -> Result<EntityStore, CliError> {
    if !path.exists() {
        debug!(path = %path.display(), "no state file, starting from seed data");
        return Ok(seed::initial_store_with_policy(policy));
    }
    let bytes = std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_snapshot(&bytes)?)
}

/// Write the entity store to `path`.
pub fn save_state(store: &EntityStore, path: &Path) -> Result<(), CliError> {
    let bytes = encode_snapshot(store)?;
    std::fs::write(path, bytes).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "state saved");
    Ok(())
}

// =============================================================================
// REPOSITORY
// =============================================================================

/// The repository picked by [`BackendKind`].
#[derive(Debug)]
pub enum Repository {
    Memory(InMemoryRepository),
    Http(HttpRepository),
}

impl Repository {
    pub fn open(config: &Config) -> Result<Self, CliError> {
        match config.backend {
            BackendKind::Memory => {
                let store = load_or_seed(&config.state_path, config.rating_policy)?;
                Ok(Self::Memory(InMemoryRepository::new(store)))
            }
            BackendKind::Http => Ok(Self::Http(HttpRepository::new(api_client(config)?))),
        }
    }

    /// Write memory state back to disk; a no-op for the HTTP backend.
    pub fn persist(self, config: &Config) -> Result<(), CliError> {
        match self {
            Self::Memory(repo) => save_state(&repo.into_inner()?, &config.state_path),
            Self::Http(_) => Ok(()),
        }
    }
}

/// API client for `config`, carrying the session token when one is stored.
pub fn api_client(config: &Config) -> Result<ApiClient, CliError> {
    let token = FileSessionStore::new(&config.session_path)
        .load()?
        .and_then(|record| record.token);
    Ok(ApiClient::with_options(
        config.api_url.clone(),
        config.timeout,
        token.as_deref(),
    )?)
}

impl UserRepository for Repository {
    async fn add_user(&self, input: NewUser) -> Result<User, Error> {
        match self {
            Self::Memory(repo) => repo.add_user(input).await,
            Self::Http(repo) => repo.add_user(input).await,
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        match self {
            Self::Memory(repo) => repo.list_users().await,
            Self::Http(repo) => repo.list_users().await,
        }
    }
}

impl StoreRepository for Repository {
    async fn add_store(&self, input: NewStore) -> Result<Store, Error> {
        match self {
            Self::Memory(repo) => repo.add_store(input).await,
            Self::Http(repo) => repo.add_store(input).await,
        }
    }

    async fn list_stores(&self) -> Result<Vec<Store>, Error> {
        match self {
            Self::Memory(repo) => repo.list_stores().await,
            Self::Http(repo) => repo.list_stores().await,
        }
    }
}

impl RatingRepository for Repository {
    async fn set_rating(&self, store_id: StoreId, rating: f64) -> Result<Rating, Error> {
        match self {
            Self::Memory(repo) => repo.set_rating(store_id, rating).await,
            Self::Http(repo) => repo.set_rating(store_id, rating).await,
        }
    }

    async fn list_ratings(&self) -> Result<Vec<Rating>, Error> {
        match self {
            Self::Memory(repo) => repo.list_ratings().await,
            Self::Http(repo) => repo.list_ratings().await,
        }
    }
}
