use crate::models::{Account, NewAccount, Role};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur when reading or writing accounts
#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored value: {0}")]
    InvalidData(String),
}

/// The server-held account table
///
/// `create` must enforce email uniqueness atomically; callers do not check
/// first and rely on [`AccountStoreError::DuplicateEmail`].
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, account: NewAccount) -> Result<Account, AccountStoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountStoreError>;

    /// Returns `false` if no account had that id
    async fn delete(&self, id: &str) -> Result<bool, AccountStoreError>;

    async fn health_check(&self) -> Result<bool, AccountStoreError>;

    /// Short backend name for health output
    fn backend(&self) -> &'static str;
}

fn new_account_record(account: NewAccount) -> Account {
    Account {
        id: uuid::Uuid::new_v4().to_string(),
        name: account.name,
        email: account.email,
        password_hash: account.password_hash,
        role: account.role,
        created_at: chrono::Utc::now(),
    }
}

/// Account store kept in process memory
///
/// Used by the test suite and when no database URL is configured. Data is
/// lost on restart.
#[derive(Default)]
pub struct InMemoryAccountStore {
    // keyed by id; email lookups scan
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(&self, account: NewAccount) -> Result<Account, AccountStoreError> {
        // uniqueness check and insert under one write lock
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(AccountStoreError::DuplicateEmail(account.email));
        }

        let record = new_account_record(account);
        accounts.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, AccountStoreError> {
        Ok(self.accounts.write().await.remove(id).is_some())
    }

    async fn health_check(&self) -> Result<bool, AccountStoreError> {
        Ok(true)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// PostgreSQL-backed account store
///
/// Email uniqueness is enforced by the `accounts_email_key` unique index.
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    /// Connect and run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, AccountStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    fn row_to_account(row: &sqlx::postgres::PgRow) -> Result<Account, AccountStoreError> {
        let role: String = row.try_get("role")?;
        let id: uuid::Uuid = row.try_get("id")?;

        Ok(Account {
            id: id.to_string(),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: role
                .parse::<Role>()
                .map_err(AccountStoreError::InvalidData)?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn create(&self, account: NewAccount) -> Result<Account, AccountStoreError> {
        let query = r#"
            INSERT INTO accounts (id, name, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id, name, email, password_hash, role, created_at
        "#;

        let email = account.email.clone();
        let result = sqlx::query(query)
            .bind(uuid::Uuid::new_v4())
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.role.as_str())
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => {
                tracing::debug!("Created account for {}", email);
                Self::row_to_account(&row)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AccountStoreError::DuplicateEmail(email))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountStoreError> {
        let query = r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM accounts
            WHERE email = $1
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool, AccountStoreError> {
        let Ok(id) = uuid::Uuid::parse_str(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<bool, AccountStoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
