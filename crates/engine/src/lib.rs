//! Persistence for transaction records.
//!
//! [`Engine`] owns the connection to the SQLite store and hands out
//! [`Session`]s, one per unit of work.

use std::{
    fmt,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, TransactionTrait};

pub use error::EngineError;
pub use session::Session;

mod error;
mod session;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;

/// Where the store lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    /// `":memory:"` selects an in-memory store, anything else is a file path.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            ":memory:" => Self::Memory,
            path => Self::File(PathBuf::from(path)),
        }
    }

    /// Connection URL. File stores are created when missing and never
    /// truncated.
    pub fn url(&self) -> String {
        match self {
            Self::Memory => String::from("sqlite::memory:"),
            Self::File(path) => format!("sqlite:{}?mode=rwc", path.display()),
        }
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str(":memory:"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    sessions: Arc<AtomicUsize>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Connect to the store at `location`.
    pub async fn open(location: &StoreLocation) -> ResultEngine<Engine> {
        tracing::info!(store = %location, "opening store");
        let database = Database::connect(location.url()).await?;
        Engine::builder().database(database).build().await
    }

    /// Create the `transactions` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> ResultEngine<()> {
        Migrator::up(&self.database, None).await?;
        tracing::debug!("schema up to date");
        Ok(())
    }

    /// Begin a unit of work.
    pub async fn session(&self) -> ResultEngine<Session> {
        let tx = self.database.begin().await?;
        let lease = session::Lease::acquire(&self.sessions);
        Ok(Session::new(tx, self.database.clone(), lease))
    }

    /// Number of sessions currently alive.
    pub fn open_sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.database
    }

    pub async fn close(self) -> ResultEngine<()> {
        self.database.close().await?;
        Ok(())
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            sessions: Arc::new(AtomicUsize::new(0)),
        })
    }
}
