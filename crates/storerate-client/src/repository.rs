//! # Repository Traits
//!
//! The seam between the dashboard and wherever its data lives. The
//! dashboard calls these traits only, so pointing it at a real service is
//! a matter of picking [`HttpRepository`](crate::HttpRepository) instead of
//! [`InMemoryRepository`](crate::InMemoryRepository).

use crate::Error;
use std::future::Future;
use storerate_core::{NewStore, NewUser, Rating, Store, StoreId, User};

/// Creation and listing of users.
pub trait UserRepository {
    /// Add a user; the repository assigns the id.
    fn add_user(&self, input: NewUser) -> impl Future<Output = Result<User, Error>> + Send;

    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, Error>> + Send;
}

/// Creation and listing of stores.
pub trait StoreRepository {
    /// Add a store; the repository assigns the id and converts the rating
    /// text leniently.
    fn add_store(&self, input: NewStore) -> impl Future<Output = Result<Store, Error>> + Send;

    fn list_stores(&self) -> impl Future<Output = Result<Vec<Store>, Error>> + Send;
}

/// Submission and listing of ratings.
pub trait RatingRepository {
    /// Record a rating. A store id with no matching store is still logged.
    fn set_rating(
        &self,
        store_id: StoreId,
        rating: f64,
    ) -> impl Future<Output = Result<Rating, Error>> + Send;

    fn list_ratings(&self) -> impl Future<Output = Result<Vec<Rating>, Error>> + Send;
}
