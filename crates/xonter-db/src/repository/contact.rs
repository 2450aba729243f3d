//! # Contact Repository
//!
//! Clients and suppliers share the `contacts` table; a repository instance is
//! bound to one owner and one [`ContactKind`], so a client list can never pick
//! up suppliers.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use xonter_core::{Contact, ContactKind, NewContact, OwnerId, MAX_LIST_ROWS};

use super::{clean_optional, decode_owner, new_id};
use crate::error::DbResult;

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: String,
    owner_id: String,
    kind: ContactKind,
    name: String,
    company: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl ContactRow {
    fn into_contact(self) -> DbResult<Contact> {
        Ok(Contact {
            owner_id: decode_owner(&self.owner_id)?,
            id: self.id,
            kind: self.kind,
            name: self.name,
            company: self.company,
            email: self.email,
            phone: self.phone,
            address: self.address,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

/// Repository for one owner's clients or suppliers.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: SqlitePool,
    owner: OwnerId,
    kind: ContactKind,
}

impl ContactRepository {
    /// Creates a repository bound to `owner` and `kind`.
    pub fn new(pool: SqlitePool, owner: OwnerId, kind: ContactKind) -> Self {
        ContactRepository { pool, owner, kind }
    }

    /// The kind of contact this repository reads and writes.
    pub fn kind(&self) -> ContactKind {
        self.kind
    }

    /// Validates and stores a new contact of this repository's kind.
    pub async fn insert(&self, payload: &NewContact) -> DbResult<Contact> {
        payload.validate()?;

        let contact = Contact {
            id: new_id(),
            owner_id: self.owner.clone(),
            kind: self.kind,
            name: payload.name.trim().to_string(),
            company: clean_optional(&payload.company),
            email: clean_optional(&payload.email),
            phone: clean_optional(&payload.phone),
            address: clean_optional(&payload.address),
            notes: clean_optional(&payload.notes),
            created_at: Utc::now(),
        };

        debug!(id = %contact.id, kind = %self.kind, "Inserting contact");

        sqlx::query(
            r#"
            INSERT INTO contacts (
                id, owner_id, kind, name, company, email, phone, address, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&contact.id)
        .bind(self.owner.as_str())
        .bind(self.kind)
        .bind(&contact.name)
        .bind(&contact.company)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.address)
        .bind(&contact.notes)
        .bind(contact.created_at)
        .execute(&self.pool)
        .await?;

        Ok(contact)
    }

    /// Lists contacts of this kind, most recently added first.
    pub async fn list(&self) -> DbResult<Vec<Contact>> {
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, owner_id, kind, name, company, email, phone, address, notes, created_at
            FROM contacts
            WHERE owner_id = ?1 AND kind = ?2
            ORDER BY created_at DESC
            LIMIT ?3
            "#,
        )
        .bind(self.owner.as_str())
        .bind(self.kind)
        .bind(MAX_LIST_ROWS)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ContactRow::into_contact).collect()
    }

    /// Counts contacts of this kind.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM contacts WHERE owner_id = ?1 AND kind = ?2")
                .bind(self.owner.as_str())
                .bind(self.kind)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
