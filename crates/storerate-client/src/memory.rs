//! In-memory repository backed by an [`EntityStore`].

use crate::Error;
use crate::repository::{RatingRepository, StoreRepository, UserRepository};
use std::future::{Future, ready};
use std::sync::RwLock;
use storerate_core::seed;
use storerate_core::{EntityStore, NewStore, NewUser, Rating, Snapshot, Store, StoreId, User};
use tracing::debug;

/// Repository that keeps everything in process memory.
///
/// The lock is only ever held inside a synchronous closure, never across
/// an await point.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<EntityStore>,
}

impl InMemoryRepository {
    pub fn new(store: EntityStore) -> Self {
        Self {
            state: RwLock::new(store),
        }
    }

    /// Repository pre-filled with the static seed data.
    pub fn seeded() -> Self {
        Self::new(seed::initial_store())
    }

    /// Current collections as a copy-on-write snapshot.
    pub fn snapshot(&self) -> Result<Snapshot, Error> {
        self.read(EntityStore::snapshot)
    }

    /// Run `f` against the current store (e.g. to persist it).
    pub fn read<R>(&self, f: impl FnOnce(&EntityStore) -> R) -> Result<R, Error> {
        let guard = self.state.read().map_err(|_| Error::StatePoisoned)?;
        Ok(f(&guard))
    }

    fn write<R>(&self, f: impl FnOnce(&mut EntityStore) -> R) -> Result<R, Error> {
        let mut guard = self.state.write().map_err(|_| Error::StatePoisoned)?;
        Ok(f(&mut guard))
    }

    /// Take the store back out of the repository.
    pub fn into_inner(self) -> Result<EntityStore, Error> {
        self.state.into_inner().map_err(|_| Error::StatePoisoned)
    }
}

impl UserRepository for InMemoryRepository {
    fn add_user(&self, input: NewUser) -> impl Future<Output = Result<User, Error>> + Send {
        let result = self.write(|store| store.add_user(input));
        if let Ok(user) = &result {
            debug!(id = %user.id, "user added in memory");
        }
        ready(result)
    }

    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, Error>> + Send {
        ready(self.read(|store| store.users().to_vec()))
    }
}

impl StoreRepository for InMemoryRepository {
    fn add_store(&self, input: NewStore) -> impl Future<Output = Result<Store, Error>> + Send {
        let result = self.write(|store| store.add_store(input));
        if let Ok(store) = &result {
            debug!(id = %store.id, rating = store.rating, "store added in memory");
        }
        ready(result)
    }

    fn list_stores(&self) -> impl Future<Output = Result<Vec<Store>, Error>> + Send {
        ready(self.read(|store| store.stores().to_vec()))
    }
}

impl RatingRepository for InMemoryRepository {
    fn set_rating(
        &self,
        store_id: StoreId,
        rating: f64,
    ) -> impl Future<Output = Result<Rating, Error>> + Send {
        ready(self.write(|store| store.set_rating(store_id, rating)))
    }

    fn list_ratings(&self) -> impl Future<Output = Result<Vec<Rating>, Error>> + Send {
        ready(self.read(|store| store.ratings().to_vec()))
    }
}
