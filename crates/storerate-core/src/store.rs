//! # Entity Store
//!
//! Holds the three collections (users, stores, ratings) and applies the
//! dashboard mutations.
//!
//! Each collection sits behind an `Arc<Vec<_>>` and every mutation goes
//! through `Arc::make_mut`. A [`Snapshot`] taken before a mutation keeps
//! seeing the old collections; the store itself moves on to a fresh copy.
//!
//! Mutations take `&mut self`, so two mutations can never interleave.

use crate::model::{NewStore, NewUser, Rating, Store, StoreId, User, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

// =============================================================================
// RATING POLICY
// =============================================================================

/// How a submitted rating updates the `rating` field of its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatingPolicy {
    /// The store's rating becomes the submitted value.
    #[default]
    LastWriteWins,
    /// The store's rating becomes the mean of every rating submitted for it.
    /// The rating entered when the store was created does not count.
    Mean,
}

impl RatingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastWriteWins => "last-write-wins",
            Self::Mean => "mean",
        }
    }
}

impl std::str::FromStr for RatingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last-write-wins" | "lww" => Ok(Self::LastWriteWins),
            "mean" | "average" => Ok(Self::Mean),
            other => Err(format!("unknown rating policy '{other}'")),
        }
    }
}

/// Running sum and count of the ratings submitted for one store.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Tally {
    sum: f64,
    count: u64,
}

impl Tally {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count = self.count.saturating_add(1);
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// An immutable view of the three collections at one point in time.
///
/// Cloning a snapshot is cheap (three reference-count bumps).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    users: Arc<Vec<User>>,
    stores: Arc<Vec<Store>>,
    ratings: Arc<Vec<Rating>>,
}

impl Snapshot {
    /// Build a snapshot from owned collections (e.g. fetched over HTTP).
    pub fn from_parts(users: Vec<User>, stores: Vec<Store>, ratings: Vec<Rating>) -> Self {
        Self {
            users: Arc::new(users),
            stores: Arc::new(stores),
            ratings: Arc::new(ratings),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }
}

// =============================================================================
// ENTITY STORE
// =============================================================================

/// The in-memory holder of users, stores and ratings.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    users: Arc<Vec<User>>,
    stores: Arc<Vec<Store>>,
    ratings: Arc<Vec<Rating>>,
    policy: RatingPolicy,
    tallies: BTreeMap<StoreId, Tally>,
}

impl EntityStore {
    /// Create an empty store with the default [`RatingPolicy`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given rating policy.
    #[must_use]
    pub fn with_policy(policy: RatingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Rebuild a store from existing collections.
    ///
    /// Store ratings are taken as given; the per-store tallies used by
    /// [`RatingPolicy::Mean`] are refolded from the ratings log.
    #[must_use]
    pub fn from_parts(
        users: Vec<User>,
        stores: Vec<Store>,
        ratings: Vec<Rating>,
        policy: RatingPolicy,
    ) -> Self {
        let mut tallies: BTreeMap<StoreId, Tally> = BTreeMap::new();
        for rating in &ratings {
            tallies.entry(rating.store_id).or_default().push(rating.rating);
        }
        Self {
            users: Arc::new(users),
            stores: Arc::new(stores),
            ratings: Arc::new(ratings),
            policy,
            tallies,
        }
    }

    pub fn policy(&self) -> RatingPolicy {
        self.policy
    }

    /// Take a copy-on-write view of the current collections.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: Arc::clone(&self.users),
            stores: Arc::clone(&self.stores),
            ratings: Arc::clone(&self.ratings),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn find_user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_store(&self, id: StoreId) -> Option<&Store> {
        self.stores.iter().find(|s| s.id == id)
    }

    /// Append a user with `id = count + 1`.
    ///
    /// Neither the email nor the role is checked.
    pub fn add_user(&mut self, input: NewUser) -> User {
        let id = UserId(self.users.len() as u64 + 1);
        let user = input.into_user(id);
        Arc::make_mut(&mut self.users).push(user.clone());
        user
    }

    /// Append a store with `id = count + 1`.
    ///
    /// The rating text is coerced leniently; unparsable input becomes `0.0`.
    pub fn add_store(&mut self, input: NewStore) -> Store {
        let id = StoreId(self.stores.len() as u64 + 1);
        let rating = input.coerced_rating();
        let store = input.into_store(id, rating);
        Arc::make_mut(&mut self.stores).push(store.clone());
        store
    }

    /// Record a rating for a store.
    ///
    /// The matching store's rating is updated according to the policy. When
    /// no store matches, the store collection is left untouched. The rating
    /// is appended to the log in both cases.
    pub fn set_rating(&mut self, store_id: StoreId, new_rating: f64) -> Rating {
        let tally = self.tallies.entry(store_id).or_default();
        tally.push(new_rating);
        let applied = match self.policy {
            RatingPolicy::LastWriteWins => new_rating,
            RatingPolicy::Mean => tally.mean(),
        };

        if let Some(index) = self.stores.iter().position(|s| s.id == store_id) {
            if let Some(store) = Arc::make_mut(&mut self.stores).get_mut(index) {
                store.rating = applied;
            }
        }

        let rating = Rating::new(store_id, new_rating);
        Arc::make_mut(&mut self.ratings).push(rating);
        rating
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use proptest::prelude::*;

    fn alice() -> NewUser {
        NewUser::new("Alice", "alice@example.com", "password1", "1 Main St", "user")
    }

    fn store_with_id_five() -> EntityStore {
        let mut store = EntityStore::new();
        for i in 1..=5 {
            store.add_store(NewStore::new(format!("Store {i}"), "Somewhere").with_rating("1"));
        }
        store
    }

    #[test]
    fn add_user_assigns_sequential_ids() {
        let mut store = EntityStore::new();
        let first = store.add_user(alice());
        let second = store.add_user(alice());
        assert_eq!(first.id, UserId(1));
        assert_eq!(second.id, UserId(2));
        // Duplicate emails are accepted.
        assert_eq!(store.users().len(), 2);
        assert_eq!(store.find_user(UserId(2)).map(|u| u.id), Some(UserId(2)));
        assert!(store.find_user(UserId(3)).is_none());
    }

    #[test]
    fn add_user_keeps_unknown_roles() {
        let mut store = EntityStore::new();
        let user = store.add_user(NewUser::new("Eve", "e@x.io", "pw", "", "superuser"));
        assert_eq!(user.role, Role::Other("superuser".to_string()));
    }

    #[test]
    fn add_store_coerces_rating() {
        let mut store = EntityStore::new();
        let bad = store.add_store(NewStore::new("X", "Y").with_rating("abc"));
        let good = store.add_store(NewStore::new("X", "Y").with_rating("3.7"));
        let missing = store.add_store(NewStore::new("X", "Y"));
        assert_eq!(bad.rating, 0.0);
        assert_eq!(good.rating, 3.7);
        assert_eq!(missing.rating, 0.0);
        assert_eq!(good.id, StoreId(2));
    }

    #[test]
    fn set_rating_last_write_wins() {
        let mut store = store_with_id_five();
        store.set_rating(StoreId(5), 4.5);
        store.set_rating(StoreId(5), 2.0);

        assert_eq!(store.find_store(StoreId(5)).map(|s| s.rating), Some(2.0));
        assert_eq!(
            store.ratings(),
            &[Rating::new(StoreId(5), 4.5), Rating::new(StoreId(5), 2.0)]
        );
        // Other stores untouched.
        assert_eq!(store.find_store(StoreId(4)).map(|s| s.rating), Some(1.0));
    }

    #[test]
    fn set_rating_missing_store_only_logs() {
        let mut store = store_with_id_five();
        let before = store.stores().to_vec();

        let rating = store.set_rating(StoreId(999), 3.0);

        assert_eq!(store.stores(), before.as_slice());
        assert_eq!(rating, Rating::new(StoreId(999), 3.0));
        assert_eq!(store.ratings(), &[Rating::new(StoreId(999), 3.0)]);
    }

    #[test]
    fn set_rating_mean_policy() {
        let mut store = EntityStore::with_policy(RatingPolicy::Mean);
        store.add_store(NewStore::new("A", "B").with_rating("5"));
        store.set_rating(StoreId(1), 4.0);
        store.set_rating(StoreId(1), 2.0);

        assert_eq!(store.find_store(StoreId(1)).map(|s| s.rating), Some(3.0));
        assert_eq!(store.ratings().len(), 2);
    }

    #[test]
    fn from_parts_refolds_tallies() {
        let mut original = EntityStore::with_policy(RatingPolicy::Mean);
        original.add_store(NewStore::new("A", "B"));
        original.set_rating(StoreId(1), 4.0);

        let mut rebuilt = EntityStore::from_parts(
            original.users().to_vec(),
            original.stores().to_vec(),
            original.ratings().to_vec(),
            RatingPolicy::Mean,
        );
        rebuilt.set_rating(StoreId(1), 2.0);
        assert_eq!(rebuilt.find_store(StoreId(1)).map(|s| s.rating), Some(3.0));
    }

    #[test]
    fn snapshot_is_isolated_from_later_mutations() {
        let mut store = store_with_id_five();
        let before = store.snapshot();

        store.add_user(alice());
        store.add_store(NewStore::new("New", "Place"));
        store.set_rating(StoreId(1), 5.0);

        assert!(before.users().is_empty());
        assert_eq!(before.stores().len(), 5);
        assert_eq!(before.stores()[0].rating, 1.0);
        assert!(before.ratings().is_empty());

        let after = store.snapshot();
        assert_eq!(after.users().len(), 1);
        assert_eq!(after.stores().len(), 6);
        assert_eq!(after.stores()[0].rating, 5.0);
    }

    #[test]
    fn rating_policy_from_str() {
        assert_eq!("mean".parse::<RatingPolicy>(), Ok(RatingPolicy::Mean));
        assert_eq!(
            "last-write-wins".parse::<RatingPolicy>(),
            Ok(RatingPolicy::LastWriteWins)
        );
        assert!("median".parse::<RatingPolicy>().is_err());
    }

    proptest! {
        #[test]
        fn user_ids_are_exactly_one_to_n(n in 0usize..64) {
            let mut store = EntityStore::new();
            for _ in 0..n {
                store.add_user(alice());
            }
            let ids: Vec<u64> = store.users().iter().map(|u| u.id.0).collect();
            let expected: Vec<u64> = (1..=n as u64).collect();
            prop_assert_eq!(ids, expected);
        }

        #[test]
        fn ratings_log_keeps_every_submission(values in proptest::collection::vec(0.0f64..5.0, 0..32)) {
            let mut store = store_with_id_five();
            for v in &values {
                store.set_rating(StoreId(3), *v);
            }
            let logged: Vec<f64> = store.ratings().iter().map(|r| r.rating).collect();
            prop_assert_eq!(&logged, &values);
            if let Some(last) = values.last() {
                prop_assert_eq!(store.find_store(StoreId(3)).map(|s| s.rating), Some(*last));
            }
        }
    }
}
