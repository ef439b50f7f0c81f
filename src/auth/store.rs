//! Credential Storage
//! Mission: Securely store and manage supplier accounts

use crate::auth::models::Identity;
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use parking_lot::RwLock;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// Registration failure
#[derive(Debug)]
pub enum RegisterError {
    /// The handle is already taken by another identity
    DuplicateHandle,
    Store(anyhow::Error),
}

impl std::fmt::Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterError::DuplicateHandle => write!(f, "Handle already exists"),
            RegisterError::Store(e) => write!(f, "Credential store failure: {}", e),
        }
    }
}

impl std::error::Error for RegisterError {}

impl From<anyhow::Error> for RegisterError {
    fn from(err: anyhow::Error) -> Self {
        RegisterError::Store(err)
    }
}

/// Credential store abstraction.
///
/// Implementations own the atomicity of `register`: two concurrent
/// registrations of the same handle must produce exactly one
/// `DuplicateHandle`.
pub trait CredentialStore: Send + Sync {
    /// Register a new identity under `handle`. The password is stored only
    /// as a salted bcrypt hash.
    fn register(&self, handle: &str, password: &str) -> Result<Identity, RegisterError>;

    /// Look up an identity by handle. Pure read, no side effects.
    fn find_by_handle(&self, handle: &str) -> Result<Option<Identity>>;

    /// Check a plaintext password against the stored hash. Never logs or
    /// returns the plaintext or the hash.
    fn verify_password(&self, identity: &Identity, password: &str) -> Result<bool> {
        verify(password, &identity.password_hash).context("Failed to verify password")
    }
}

fn new_identity(handle: &str, password: &str) -> Result<Identity> {
    let password_hash = hash(password, DEFAULT_COST).context("Failed to hash password")?;

    Ok(Identity {
        id: Uuid::new_v4(),
        handle: handle.to_string(),
        password_hash,
        created_at: Utc::now().to_rfc3339(),
    })
}

/// In-memory credential store, lives for the process lifetime only.
///
/// The default backend: supplier accounts are ephemeral and re-registered
/// after a restart.
#[derive(Default)]
pub struct MemoryCredentialStore {
    identities: RwLock<HashMap<String, Identity>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn register(&self, handle: &str, password: &str) -> Result<Identity, RegisterError> {
        // Hash before taking the lock; bcrypt is deliberately slow.
        let identity = new_identity(handle, password)?;

        let mut identities = self.identities.write();
        if identities.contains_key(handle) {
            return Err(RegisterError::DuplicateHandle);
        }
        identities.insert(handle.to_string(), identity.clone());

        info!("✅ Registered supplier: {}", identity.handle);
        Ok(identity)
    }

    fn find_by_handle(&self, handle: &str) -> Result<Option<Identity>> {
        Ok(self.identities.read().get(handle).cloned())
    }
}

/// SQLite-backed credential store, selected via AUTH_DB_PATH.
pub struct SqliteCredentialStore {
    db_path: String,
}

impl SqliteCredentialStore {
    /// Create the store and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS identities (
                id TEXT PRIMARY KEY,
                handle TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn register(&self, handle: &str, password: &str) -> Result<Identity, RegisterError> {
        let identity = new_identity(handle, password)?;

        let conn = Connection::open(&self.db_path).context("Failed to open credential db")?;
        let insert = conn.execute(
            "INSERT INTO identities (id, handle, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                identity.id.to_string(),
                identity.handle,
                identity.password_hash,
                identity.created_at,
            ],
        );

        match insert {
            Ok(_) => {
                info!("✅ Registered supplier: {}", identity.handle);
                Ok(identity)
            }
            // The UNIQUE column is the race arbiter here.
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(RegisterError::DuplicateHandle)
            }
            Err(e) => Err(RegisterError::Store(
                anyhow::Error::new(e).context("Failed to insert identity"),
            )),
        }
    }

    fn find_by_handle(&self, handle: &str) -> Result<Option<Identity>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, handle, password_hash, created_at
             FROM identities WHERE handle = ?1",
        )?;

        let identity_result = stmt.query_row(params![handle], |row| {
            let id_str: String = row.get(0)?;
            Ok(Identity {
                id: Uuid::parse_str(&id_str).unwrap_or_default(),
                handle: row.get(1)?,
                password_hash: row.get(2)?,
                created_at: row.get(3)?,
            })
        });

        match identity_result {
            Ok(identity) => Ok(Some(identity)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
