//! Command-line interface.
//!
//! Every `cmd_*` function returns the value it produced so the commands can
//! be driven from tests; [`run`] does the printing.

use crate::backend::{Repository, save_state};
use crate::config::{BackendKind, Config, ConfigError};
use crate::session_file::FileSessionStore;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use storerate_client::flows::{self, LOGIN_FAILED, SIGNUP_FAILED, SignupOutcome};
use storerate_client::{ApiClient, Dashboard, RatingRepository, StoreRepository, UserRepository};
use storerate_core::formats::FormatError;
use storerate_core::{
    EntityStore, LoginForm, NewStore, NewUser, Rating, RatingPolicy, Role, Route, SessionError,
    SessionRecord, SessionStore, SignupForm, Statistics, Store, StoreId, User, UserId,
    coerce_rating, parse_rating_strict, seed,
};
use thiserror::Error;
use tracing::info;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum CliError {
    /// A login or signup failed; `message` is what the operator sees.
    #[error("{message}")]
    Flow {
        message: String,
        #[source]
        source: storerate_client::Error,
    },

    #[error(transparent)]
    Client(#[from] storerate_client::Error),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("State file is unreadable: {0}")]
    Format(#[from] FormatError),

    #[error("Session file error: {0}")]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "storerate", version, about = "Store rating dashboard")]
pub struct Cli {
    /// Where dashboard data lives (memory or http)
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    /// State file used by the memory backend
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Session record file
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    /// Base URL of the API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Reject store ratings that are not plain numbers
    #[arg(long, global = true)]
    pub strict_ratings: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the state file for the memory backend
    Init {
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
        /// Start with no users, stores or ratings
        #[arg(long)]
        empty: bool,
        /// Rating policy (last-write-wins or mean)
        #[arg(long)]
        policy: Option<RatingPolicy>,
    },
    /// Log in and print the view for the account's role
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STORERATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "STORERATE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "")]
        address: String,
        /// user, owner or admin
        #[arg(long)]
        role: String,
    },
    /// Forget the current session
    Logout,
    /// Show the current session
    Whoami,
    /// Add a user
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// Add a store
    AddStore {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        owner_id: Option<u64>,
        /// Initial rating as typed
        #[arg(long)]
        rating: Option<String>,
    },
    /// Submit a rating for a store
    Rate {
        store_id: u64,
        #[arg(allow_hyphen_values = true)]
        rating: String,
    },
    /// Print dashboard statistics
    Stats,
    /// List one collection
    List {
        #[arg(value_enum)]
        kind: ListKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Users,
    Stores,
    Ratings,
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(state) = &self.state {
            config.state_path = state.clone();
        }
        if let Some(session) = &self.session {
            config.session_path = session.clone();
        }
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        config.json |= self.json;
        config.strict_ratings |= self.strict_ratings;
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Create the memory backend's state file.
pub fn cmd_init(
    config: &Config,
    force: bool,
    empty: bool,
    policy: Option<RatingPolicy>,
) -> Result<EntityStore, CliError> {
    let path = &config.state_path;
    if path.exists() && !force {
        return Err(CliError::AlreadyExists(path.clone()));
    }

    let policy = policy.unwrap_or(config.rating_policy);
    let store = if empty {
        EntityStore::with_policy(policy)
    } else {
        seed::initial_store_with_policy(policy)
    };
    save_state(&store, path)?;
    info!(path = %path.display(), policy = policy.as_str(), empty, "state initialized");
    Ok(store)
}

pub async fn cmd_login(config: &Config, form: &LoginForm) -> Result<Route, CliError> {
    let api = ApiClient::with_options(config.api_url.clone(), config.timeout, None)?;
    let mut sessions = FileSessionStore::new(&config.session_path);
    flows::login(&api, form, &mut sessions)
        .await
        .map_err(|source| CliError::Flow {
            message: source.user_message(LOGIN_FAILED),
            source,
        })
}

pub async fn cmd_signup(config: &Config, form: &SignupForm) -> Result<SignupOutcome, CliError> {
    let api = ApiClient::with_options(config.api_url.clone(), config.timeout, None)?;
    flows::signup(&api, form)
        .await
        .map_err(|source| CliError::Flow {
            message: source.user_message(SIGNUP_FAILED),
            source,
        })
}

pub fn cmd_logout(config: &Config) -> Result<Route, CliError> {
    let mut sessions = FileSessionStore::new(&config.session_path);
    Ok(flows::logout(&mut sessions)?)
}

pub fn cmd_whoami(config: &Config) -> Result<Option<SessionRecord>, CliError> {
    Ok(FileSessionStore::new(&config.session_path).load()?)
}

pub async fn cmd_add_user(config: &Config, input: NewUser) -> Result<User, CliError> {
    let dashboard = open_dashboard(config)?;
    let user = dashboard.add_user(input).await?;
    dashboard.into_repository().persist(config)?;
    Ok(user)
}

pub async fn cmd_add_store(config: &Config, input: NewStore) -> Result<Store, CliError> {
    let dashboard = open_dashboard(config)?;
    let store = dashboard.add_store(input).await?;
    dashboard.into_repository().persist(config)?;
    Ok(store)
}

/// Submit a rating. The typed value is coerced like a form field unless
/// strict ratings are on.
pub async fn cmd_rate(config: &Config, store_id: StoreId, raw: &str) -> Result<Rating, CliError> {
    let value = if config.strict_ratings {
        parse_rating_strict(raw).map_err(storerate_client::Error::from)?
    } else {
        coerce_rating(raw)
    };
    let dashboard = open_dashboard(config)?;
    let rating = dashboard.set_rating(store_id, value).await?;
    dashboard.into_repository().persist(config)?;
    Ok(rating)
}

pub async fn cmd_stats(config: &Config) -> Result<Statistics, CliError> {
    Ok(open_dashboard(config)?.stats().await?)
}

/// One collection, as returned by [`cmd_list`].
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Users(Vec<User>),
    Stores(Vec<Store>),
    Ratings(Vec<Rating>),
}

pub async fn cmd_list(config: &Config, kind: ListKind) -> Result<Listing, CliError> {
    let repo = Repository::open(config)?;
    Ok(match kind {
        ListKind::Users => Listing::Users(repo.list_users().await?),
        ListKind::Stores => Listing::Stores(repo.list_stores().await?),
        ListKind::Ratings => Listing::Ratings(repo.list_ratings().await?),
    })
}

fn open_dashboard(config: &Config) -> Result<Dashboard<Repository>, CliError> {
    Ok(Dashboard::new(Repository::open(config)?).with_strict_ratings(config.strict_ratings))
}

// =============================================================================
// OUTPUT
// =============================================================================

/// A user as printed; the password never leaves the process.
#[derive(Serialize)]
struct UserRow<'a> {
    id: UserId,
    name: &'a str,
    email: &'a str,
    address: &'a str,
    role: &'a Role,
}

impl<'a> From<&'a User> for UserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: user.id,
            name: &user.name,
            email: &user.email,
            address: &user.address,
            role: &user.role,
        }
    }
}

fn emit<T: Serialize + ?Sized>(
    config: &Config,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<(), CliError> {
    if config.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn user_line(user: &User) -> String {
    format!(
        "{:>4}  {:<24} {:<32} {}",
        user.id, user.name, user.email, user.role
    )
}

fn store_line(store: &Store) -> String {
    let owner = store
        .owner_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>4}  {:<24} {:<32} owner {:<4} rating {:.2}",
        store.id, store.name, store.address, owner, store.rating
    )
}

fn rating_line(rating: &Rating) -> String {
    format!("store {:>4}  {:.2}", rating.store_id, rating.rating)
}

fn route_json(route: Route) -> serde_json::Value {
    serde_json::json!({ "route": route.path() })
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Run a parsed command line against the environment configuration.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::load()?;
    cli.apply(&mut config);
    execute(&config, cli.command).await
}

/// Run one command with a resolved configuration.
pub async fn execute(config: &Config, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Init {
            force,
            empty,
            policy,
        } => {
            let store = cmd_init(config, force, empty, policy)?;
            let summary = serde_json::json!({
                "path": config.state_path.display().to_string(),
                "policy": store.policy(),
                "users": store.users().len(),
                "stores": store.stores().len(),
                "ratings": store.ratings().len(),
            });
            emit(config, &summary, || {
                format!(
                    "Initialized {} ({} users, {} stores, {} ratings, policy {})",
                    config.state_path.display(),
                    store.users().len(),
                    store.stores().len(),
                    store.ratings().len(),
                    store.policy().as_str()
                )
            })
        }
        Commands::Login { email, password } => {
            let route = cmd_login(config, &LoginForm::new(email, password)).await?;
            emit(config, &route_json(route), || format!("Logged in. Go to {route}"))
        }
        Commands::Signup {
            name,
            email,
            password,
            address,
            role,
        } => {
            let form = SignupForm {
                name,
                email,
                password,
                address,
                role,
            };
            let outcome = cmd_signup(config, &form).await?;
            let value = serde_json::json!({
                "message": outcome.message,
                "route": outcome.next.path(),
            });
            emit(config, &value, || {
                format!("{} Go to {}", outcome.message, outcome.next)
            })
        }
        Commands::Logout => {
            let route = cmd_logout(config)?;
            emit(config, &route_json(route), || {
                format!("Logged out. Go to {route}")
            })
        }
        Commands::Whoami => {
            let record = cmd_whoami(config)?;
            emit(config, &record, || match &record {
                Some(record) => format!(
                    "{} (id {}, role {})",
                    record.name, record.user_id, record.role
                ),
                None => "Not logged in".to_string(),
            })
        }
        Commands::AddUser {
            name,
            email,
            password,
            address,
            role,
        } => {
            let input = NewUser::new(name, email, password, address, role);
            let user = cmd_add_user(config, input).await?;
            emit(config, &UserRow::from(&user), || user_line(&user))
        }
        Commands::AddStore {
            name,
            address,
            owner_id,
            rating,
        } => {
            let mut input = NewStore::new(name, address);
            if let Some(owner_id) = owner_id {
                input = input.with_owner(UserId(owner_id));
            }
            if let Some(rating) = rating {
                input = input.with_rating(rating);
            }
            let store = cmd_add_store(config, input).await?;
            emit(config, &store, || store_line(&store))
        }
        Commands::Rate { store_id, rating } => {
            let saved = cmd_rate(config, StoreId(store_id), &rating).await?;
            emit(config, &saved, || rating_line(&saved))
        }
        Commands::Stats => {
            let stats = cmd_stats(config).await?;
            emit(config, &stats, || stats.to_text())
        }
        Commands::List { kind } => match cmd_list(config, kind).await? {
            Listing::Users(users) => {
                let rows: Vec<UserRow<'_>> = users.iter().map(UserRow::from).collect();
                emit(config, &rows, || join_lines(&users, user_line))
            }
            Listing::Stores(stores) => emit(config, &stores, || join_lines(&stores, store_line)),
            Listing::Ratings(ratings) => {
                emit(config, &ratings, || join_lines(&ratings, rating_line))
            }
        },
    }
}

fn join_lines<T>(items: &[T], line: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items.iter().map(line).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "storerate",
            "--backend",
            "http",
            "--api-url",
            "http://example.test/api",
            "--json",
            "stats",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.backend, BackendKind::Http);
        assert_eq!(config.api_url, "http://example.test/api");
        assert!(config.json);
        assert!(!config.strict_ratings);
    }

    #[test]
    fn parses_rate_and_list() {
        let cli = Cli::parse_from(["storerate", "rate", "2", "4.5"]);
        assert!(matches!(cli.command, Commands::Rate { store_id: 2, ref rating } if rating == "4.5"));

        let cli = Cli::parse_from(["storerate", "list", "stores"]);
        assert!(matches!(
            cli.command,
            Commands::List {
                kind: ListKind::Stores
            }
        ));
    }

    #[test]
    fn init_policy_is_parsed() {
        let cli = Cli::parse_from(["storerate", "init", "--policy", "mean", "--empty"]);
        assert!(matches!(
            cli.command,
            Commands::Init {
                empty: true,
                policy: Some(RatingPolicy::Mean),
                ..
            }
        ));
    }

    #[test]
    fn store_line_shows_missing_owner() {
        let store = Store {
            id: StoreId(7),
            name: "Corner".into(),
            address: "1 Road".into(),
            owner_id: None,
            rating: 4.25,
        };
        let line = store_line(&store);
        assert!(line.contains("owner -"));
        assert!(line.contains("rating 4.25"));
    }
}
