//! # Transaction Repository
//!
//! Database operations for income and expense records.
//!
//! ## Key Operations
//! - Insert a validated transaction
//! - List for the finance view (optionally one kind, newest first)
//! - Fetch only `kind, amount` for one month (the dashboard projection)

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use xonter_core::{
    MonthRange, NewTransaction, OwnerId, Transaction, TransactionAmount, TransactionFilter,
    TransactionKind, MAX_LIST_ROWS,
};

use super::{clean_optional, decode_money, decode_owner, encode_money, new_id};
use crate::error::DbResult;

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    owner_id: String,
    kind: TransactionKind,
    category: String,
    amount: String,
    description: Option<String>,
    occurred_on: NaiveDate,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_transaction(self) -> DbResult<Transaction> {
        Ok(Transaction {
            amount: decode_money("amount", &self.amount)?,
            owner_id: decode_owner(&self.owner_id)?,
            id: self.id,
            kind: self.kind,
            category: self.category,
            description: self.description,
            occurred_on: self.occurred_on,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AmountRow {
    kind: TransactionKind,
    amount: String,
}

/// Repository for one owner's transactions.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
    owner: OwnerId,
}

impl TransactionRepository {
    /// Creates a repository bound to `owner`.
    pub fn new(pool: SqlitePool, owner: OwnerId) -> Self {
        TransactionRepository { pool, owner }
    }

    /// Validates and stores a new transaction.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - The stored record with its new id
    /// * `Err(DbError::Validation)` - Negative amount, blank category, ...
    pub async fn insert(&self, payload: &NewTransaction) -> DbResult<Transaction> {
        payload.validate()?;

        let transaction = Transaction {
            id: new_id(),
            owner_id: self.owner.clone(),
            kind: payload.kind,
            category: payload.category.trim().to_string(),
            amount: payload.amount,
            description: clean_optional(&payload.description),
            occurred_on: payload.occurred_on,
            created_at: Utc::now(),
        };

        debug!(
            id = %transaction.id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            "Inserting transaction"
        );

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, owner_id, kind, category, amount, description, occurred_on, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&transaction.id)
        .bind(self.owner.as_str())
        .bind(transaction.kind)
        .bind(&transaction.category)
        .bind(encode_money(transaction.amount))
        .bind(&transaction.description)
        .bind(transaction.occurred_on)
        .bind(transaction.created_at)
        .execute(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Lists transactions, newest business date first.
    ///
    /// Ties on the same date are broken by insert time, newest first.
    pub async fn list(&self, filter: TransactionFilter) -> DbResult<Vec<Transaction>> {
        debug!(owner = %self.owner, kind = ?filter.kind, "Listing transactions");

        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, owner_id, kind, category, amount, description, occurred_on, created_at
            FROM transactions
            WHERE owner_id = ?1
              AND (?2 IS NULL OR kind = ?2)
            ORDER BY occurred_on DESC, created_at DESC
            LIMIT ?3
            "#,
        )
        .bind(self.owner.as_str())
        .bind(filter.kind)
        .bind(MAX_LIST_ROWS)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }

    /// Fetches `kind, amount` of every transaction dated inside `month`.
    ///
    /// Both month ends are inclusive.
    pub async fn amounts_between(&self, month: MonthRange) -> DbResult<Vec<TransactionAmount>> {
        debug!(owner = %self.owner, %month, "Fetching transaction amounts");

        let rows = sqlx::query_as::<_, AmountRow>(
            r#"
            SELECT kind, amount
            FROM transactions
            WHERE owner_id = ?1
              AND occurred_on >= ?2
              AND occurred_on <= ?3
            "#,
        )
        .bind(self.owner.as_str())
        .bind(month.start())
        .bind(month.end())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(TransactionAmount {
                    kind: row.kind,
                    amount: decode_money("amount", &row.amount)?,
                })
            })
            .collect()
    }

    /// Gets a transaction by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Transaction))` - Found and owned by this repository's owner
    /// * `Ok(None)` - Missing, or owned by someone else
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, owner_id, kind, category, amount, description, occurred_on, created_at
            FROM transactions
            WHERE id = ?1 AND owner_id = ?2
            "#,
        )
        .bind(id)
        .bind(self.owner.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_transaction).transpose()
    }

    /// Counts this owner's transactions.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE owner_id = ?1")
                .bind(self.owner.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
