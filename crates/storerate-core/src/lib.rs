//! # storerate-core
//!
//! The in-memory logic behind the store-rating dashboard.
//!
//! ```text
//! ┌──────────────────────┐   snapshot()   ┌──────────────────────┐
//! │   EntityStore        │ ─────────────► │   Statistics         │
//! │   users / stores /   │                │   (pure projection)  │
//! │   ratings (CoW)      │                └──────────────────────┘
//! └──────────────────────┘
//!           ▲ add_user / add_store / set_rating
//!
//! role string ──► RoleGate ──► Route | GateError
//! ```
//!
//! This crate has no async and no network code. The HTTP client and the
//! repository traits live in `storerate-client`.

pub mod formats;
pub mod gate;
pub mod input;
pub mod model;
pub mod seed;
pub mod session;
pub mod stats;
pub mod store;
pub mod validate;

pub use gate::{GateError, Route, RoleGate, UNKNOWN_ROLE_MESSAGE};
pub use input::{RatingInputError, coerce_rating, parse_rating_strict};
pub use model::{NewStore, NewUser, Password, Rating, Role, Store, StoreId, User, UserId};
pub use session::{MemorySessionStore, SessionError, SessionRecord, SessionStore};
pub use stats::{Statistics, StoreSummary};
pub use store::{EntityStore, RatingPolicy, Snapshot};
pub use validate::{FieldError, FieldErrorKind, LoginForm, SignupForm, ValidationErrors};
