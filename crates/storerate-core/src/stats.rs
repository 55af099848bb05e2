//! # Statistics Projection
//!
//! Dashboard aggregates derived from a [`Snapshot`]. Nothing is cached:
//! every call folds the collections again, so two calls over the same
//! snapshot always agree.

use crate::model::{Rating, Store, StoreId, User};
use crate::store::Snapshot;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-store line of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub store_id: StoreId,
    pub name: String,
    /// The store's `rating` field as currently held.
    pub current_rating: f64,
    /// Number of ratings submitted for this store.
    pub submitted: usize,
    /// Mean of the submitted ratings, `None` when there are none.
    pub average_submitted: Option<f64>,
}

/// Aggregate counts and averages for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_users: usize,
    pub total_stores: usize,
    pub total_ratings: usize,
    /// Users counted by role string, in lexical order.
    pub users_by_role: BTreeMap<String, usize>,
    /// Mean of every submitted rating, `None` for an empty log.
    pub average_rating: Option<f64>,
    /// Ratings whose store id matches no store.
    pub orphaned_ratings: usize,
    pub stores: Vec<StoreSummary>,
}

#[derive(Default)]
struct Fold {
    sum: f64,
    count: usize,
}

impl Fold {
    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

impl Statistics {
    /// Compute statistics for a snapshot.
    pub fn compute(snapshot: &Snapshot) -> Self {
        Self::from_collections(snapshot.users(), snapshot.stores(), snapshot.ratings())
    }

    /// Compute statistics from borrowed collections.
    pub fn from_collections(users: &[User], stores: &[Store], ratings: &[Rating]) -> Self {
        let mut users_by_role: BTreeMap<String, usize> = BTreeMap::new();
        for user in users {
            *users_by_role.entry(user.role.as_str().to_string()).or_default() += 1;
        }

        let mut per_store: BTreeMap<StoreId, Fold> = BTreeMap::new();
        let mut overall = Fold::default();
        for rating in ratings {
            let fold = per_store.entry(rating.store_id).or_default();
            fold.sum += rating.rating;
            fold.count += 1;
            overall.sum += rating.rating;
            overall.count += 1;
        }

        let summaries: Vec<StoreSummary> = stores
            .iter()
            .map(|store| {
                let fold = per_store.get(&store.id);
                StoreSummary {
                    store_id: store.id,
                    name: store.name.clone(),
                    current_rating: store.rating,
                    submitted: fold.map(|f| f.count).unwrap_or(0),
                    average_submitted: fold.and_then(Fold::mean),
                }
            })
            .collect();

        let orphaned_ratings = ratings
            .iter()
            .filter(|r| !stores.iter().any(|s| s.id == r.store_id))
            .count();

        Self {
            total_users: users.len(),
            total_stores: stores.len(),
            total_ratings: ratings.len(),
            users_by_role,
            average_rating: overall.mean(),
            orphaned_ratings,
            stores: summaries,
        }
    }

    /// Format as a plain-text dashboard panel.
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str(PANEL_TOP);
        push_row(&mut output, "DASHBOARD");
        output.push_str(PANEL_RULE);
        push_row(&mut output, &format!("Users:   {}", self.total_users));
        for (role, count) in &self.users_by_role {
            push_row(&mut output, &format!("  {}: {}", role, count));
        }
        push_row(&mut output, &format!("Stores:  {}", self.total_stores));
        push_row(&mut output, &format!("Ratings: {}", self.total_ratings));
        match self.average_rating {
            Some(avg) => push_row(&mut output, &format!("Average: {:.2}", avg)),
            None => push_row(&mut output, "Average: (no ratings)"),
        }
        if self.orphaned_ratings > 0 {
            push_row(
                &mut output,
                &format!("Orphaned ratings: {}", self.orphaned_ratings),
            );
        }

        output.push_str(PANEL_RULE);
        push_row(&mut output, "STORES");
        if self.stores.is_empty() {
            push_row(&mut output, "- (none)");
        } else {
            for s in &self.stores {
                let avg = s
                    .average_submitted
                    .map(|a| format!("{:.2}", a))
                    .unwrap_or_else(|| "-".to_string());
                push_row(&mut output, &format!("- #{} {}", s.store_id, s.name));
                push_row(
                    &mut output,
                    &format!(
                        "  rating {:.1}, {} submitted, avg {}",
                        s.current_rating, s.submitted, avg
                    ),
                );
            }
        }
        output.push_str(PANEL_BOTTOM);

        output
    }
}

const PANEL_WIDTH: usize = 37;
const PANEL_TOP: &str = "┌─────────────────────────────────────┐\n";
const PANEL_RULE: &str = "├─────────────────────────────────────┤\n";
const PANEL_BOTTOM: &str = "└─────────────────────────────────────┘\n";

/// One framed panel line. Text longer than the panel is cut with `…`.
fn push_row(output: &mut String, text: &str) {
    let inner = PANEL_WIDTH - 2;
    let fitted: String = if text.chars().count() > inner {
        text.chars()
            .take(inner - 1)
            .chain(std::iter::once('…'))
            .collect()
    } else {
        text.to_string()
    };
    output.push_str(&format!("│ {:<width$} │\n", fitted, width = inner));
}

// =============================================================================
// TESTS
// =============================================================================
