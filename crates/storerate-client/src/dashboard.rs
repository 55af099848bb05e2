//! # Dashboard Service
//!
//! The admin dashboard's operations over any repository: add a user, add a
//! store, submit a rating, and read the statistics.

use crate::Error;
use crate::repository::{RatingRepository, StoreRepository, UserRepository};
use storerate_core::{
    NewStore, NewUser, Rating, Snapshot, Statistics, Store, StoreId, User, parse_rating_strict,
};
use tracing::info;

/// Dashboard over a repository `R`.
#[derive(Debug)]
pub struct Dashboard<R> {
    repo: R,
    strict_ratings: bool,
}

impl<R> Dashboard<R>
where
    R: UserRepository + StoreRepository + RatingRepository,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            strict_ratings: false,
        }
    }

    /// Reject unparsable store ratings instead of coercing them to 0.
    #[must_use]
    pub fn with_strict_ratings(mut self, strict: bool) -> Self {
        self.strict_ratings = strict;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    pub async fn add_user(&self, input: NewUser) -> Result<User, Error> {
        let user = self.repo.add_user(input).await?;
        info!(id = %user.id, role = %user.role, "user added");
        Ok(user)
    }

    pub async fn add_store(&self, input: NewStore) -> Result<Store, Error> {
        if self.strict_ratings {
            parse_rating_strict(&input.rating)?;
        }
        let store = self.repo.add_store(input).await?;
        info!(id = %store.id, rating = store.rating, "store added");
        Ok(store)
    }

    pub async fn set_rating(&self, store_id: StoreId, rating: f64) -> Result<Rating, Error> {
        let saved = self.repo.set_rating(store_id, rating).await?;
        info!(%store_id, rating, "rating submitted");
        Ok(saved)
    }

    /// Read all three collections.
    pub async fn snapshot(&self) -> Result<Snapshot, Error> {
        let users = self.repo.list_users().await?;
        let stores = self.repo.list_stores().await?;
        let ratings = self.repo.list_ratings().await?;
        Ok(Snapshot::from_parts(users, stores, ratings))
    }

    /// Compute the dashboard statistics from a fresh read.
    pub async fn stats(&self) -> Result<Statistics, Error> {
        Ok(Statistics::compute(&self.snapshot().await?))
    }
}
