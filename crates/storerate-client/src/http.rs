//! HTTP-backed repository.
//!
//! | Operation    | Request                          |
//! |--------------|----------------------------------|
//! | add_user     | `POST /users` with a `NewUser`   |
//! | list_users   | `GET /users`                     |
//! | add_store    | `POST /stores`, rating as number |
//! | list_stores  | `GET /stores`                    |
//! | set_rating   | `POST /ratings`                  |
//! | list_ratings | `GET /ratings`                   |

use crate::Error;
use crate::api::ApiClient;
use crate::repository::{RatingRepository, StoreRepository, UserRepository};
use serde::Serialize;
use storerate_core::{NewStore, NewUser, Rating, Store, StoreId, User, UserId};
use tracing::info;

/// Body of `POST /stores`. The rating text is coerced before it is sent,
/// so the server always receives a number.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreBody<'a> {
    name: &'a str,
    address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_id: Option<UserId>,
    rating: f64,
}

/// Repository that forwards every operation to the API.
#[derive(Debug, Clone)]
pub struct HttpRepository {
    api: ApiClient,
}

impl HttpRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

impl UserRepository for HttpRepository {
    async fn add_user(&self, input: NewUser) -> Result<User, Error> {
        let user: User = self.api.post_json("users", &input).await?;
        info!(id = %user.id, "user created remotely");
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.api.get_json("users").await
    }
}

impl StoreRepository for HttpRepository {
    async fn add_store(&self, input: NewStore) -> Result<Store, Error> {
        let body = StoreBody {
            name: &input.name,
            address: &input.address,
            owner_id: input.owner_id,
            rating: input.coerced_rating(),
        };
        let store: Store = self.api.post_json("stores", &body).await?;
        info!(id = %store.id, "store created remotely");
        Ok(store)
    }

    async fn list_stores(&self) -> Result<Vec<Store>, Error> {
        self.api.get_json("stores").await
    }
}

impl RatingRepository for HttpRepository {
    async fn set_rating(&self, store_id: StoreId, rating: f64) -> Result<Rating, Error> {
        let body = Rating::new(store_id, rating);
        let saved: Rating = self.api.post_json("ratings", &body).await?;
        info!(store_id = %saved.store_id, rating = saved.rating, "rating submitted remotely");
        Ok(saved)
    }

    async fn list_ratings(&self) -> Result<Vec<Rating>, Error> {
        self.api.get_json("ratings").await
    }
}
