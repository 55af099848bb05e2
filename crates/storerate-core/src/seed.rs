//! Static mock data the dashboard starts from.

use crate::model::{NewStore, NewUser, StoreId, UserId};
use crate::store::{EntityStore, RatingPolicy};

/// Seeded users as (name, email, password, address, role).
const USERS: &[(&str, &str, &str, &str, &str)] = &[
    ("System Administrator", "admin@example.com", "Admin@1234", "1 Admin Plaza", "admin"),
    ("Olivia Store Owner", "owner@example.com", "Owner@1234", "22 Market Street", "owner"),
    ("Normal Regular User", "user@example.com", "User@12345", "7 Elm Avenue", "user"),
];

/// Seeded stores as (name, address, owner, initial rating).
const STORES: &[(&str, &str, Option<u64>, &str)] = &[
    ("Fresh Mart", "22 Market Street", Some(2), "4.2"),
    ("Tech Corner", "9 Circuit Road", Some(2), "3.8"),
    ("Book Nook", "14 Library Lane", None, "4.6"),
];

/// Seeded ratings as (store id, rating).
const RATINGS: &[(u64, f64)] = &[(1, 4.0), (1, 4.5), (2, 3.8), (3, 4.6)];

/// Build the initial dashboard state with the default rating policy.
pub fn initial_store() -> EntityStore {
    initial_store_with_policy(RatingPolicy::default())
}

/// Build the initial dashboard state with a chosen rating policy.
///
/// Seed ratings go straight into the log so the stores keep their listed
/// ratings.
pub fn initial_store_with_policy(policy: RatingPolicy) -> EntityStore {
    let mut seeded = EntityStore::new();
    for (name, email, password, address, role) in USERS {
        seeded.add_user(NewUser::new(*name, *email, *password, *address, *role));
    }
    for (name, address, owner, rating) in STORES {
        let mut input = NewStore::new(*name, *address).with_rating(*rating);
        input.owner_id = owner.map(UserId);
        seeded.add_store(input);
    }
    let ratings = RATINGS
        .iter()
        .map(|(store, value)| crate::model::Rating::new(StoreId(*store), *value))
        .collect();

    EntityStore::from_parts(
        seeded.users().to_vec(),
        seeded.stores().to_vec(),
        ratings,
        policy,
    )
}
