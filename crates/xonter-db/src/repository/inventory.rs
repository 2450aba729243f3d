//! # Inventory Repository
//!
//! Database operations for products and services.
//!
//! ## Key Operations
//! - Insert with a default unit of measure
//! - List for the inventory view (optionally one kind, newest first)
//! - Absolute quantity updates (stock counts, not deltas)
//! - `stock_levels` projection: only `quantity, sale_price`, for the dashboard

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use xonter_core::validation::validate_quantity;
use xonter_core::{
    InventoryFilter, InventoryItem, ItemKind, NewInventoryItem, OwnerId, StockLevel, MAX_LIST_ROWS,
};

use super::{clean_optional, decode_money, decode_owner, encode_money, new_id};
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: String,
    owner_id: String,
    name: String,
    description: Option<String>,
    kind: ItemKind,
    quantity: i64,
    purchase_price: String,
    sale_price: String,
    unit: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InventoryRow {
    fn into_item(self) -> DbResult<InventoryItem> {
        Ok(InventoryItem {
            purchase_price: decode_money("purchase_price", &self.purchase_price)?,
            sale_price: decode_money("sale_price", &self.sale_price)?,
            owner_id: decode_owner(&self.owner_id)?,
            id: self.id,
            name: self.name,
            description: self.description,
            kind: self.kind,
            quantity: self.quantity,
            unit: self.unit,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    quantity: i64,
    sale_price: String,
}

const SELECT_ITEM: &str = r#"
    SELECT id, owner_id, name, description, kind, quantity,
           purchase_price, sale_price, unit, created_at, updated_at
    FROM inventory_items
"#;

/// Repository for one owner's inventory.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
    owner: OwnerId,
}

impl InventoryRepository {
    /// Creates a repository bound to `owner`.
    pub fn new(pool: SqlitePool, owner: OwnerId) -> Self {
        InventoryRepository { pool, owner }
    }

    /// Validates and stores a new item.
    ///
    /// A blank unit is stored as [`xonter_core::DEFAULT_UNIT`].
    pub async fn insert(&self, payload: &NewInventoryItem) -> DbResult<InventoryItem> {
        payload.validate()?;

        let now = Utc::now();
        let item = InventoryItem {
            id: new_id(),
            owner_id: self.owner.clone(),
            name: payload.name.trim().to_string(),
            description: clean_optional(&payload.description),
            kind: payload.kind,
            quantity: payload.quantity,
            purchase_price: payload.purchase_price,
            sale_price: payload.sale_price,
            unit: payload.unit_or_default().to_string(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %item.id, name = %item.name, quantity = item.quantity, "Inserting inventory item");

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, owner_id, name, description, kind, quantity,
                purchase_price, sale_price, unit, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&item.id)
        .bind(self.owner.as_str())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.kind)
        .bind(item.quantity)
        .bind(encode_money(item.purchase_price))
        .bind(encode_money(item.sale_price))
        .bind(&item.unit)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists items matching `filter`, most recently added first.
    pub async fn list(&self, filter: InventoryFilter) -> DbResult<Vec<InventoryItem>> {
        debug!(owner = %self.owner, kind = ?filter.kind, "Listing inventory");

        let sql = format!(
            "{SELECT_ITEM} WHERE owner_id = ?1 AND (?2 IS NULL OR kind = ?2) \
             ORDER BY created_at DESC LIMIT ?3"
        );

        let rows = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(self.owner.as_str())
            .bind(filter.kind)
            .bind(MAX_LIST_ROWS)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(InventoryRow::into_item).collect()
    }

    /// Gets an item by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let sql = format!("{SELECT_ITEM} WHERE id = ?1 AND owner_id = ?2");

        let row = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(id)
            .bind(self.owner.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(InventoryRow::into_item).transpose()
    }

    /// Replaces the stock quantity of an item.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - Negative quantity
    /// * `Err(DbError::NotFound)` - No such item for this owner
    pub async fn update_quantity(&self, id: &str, quantity: i64) -> DbResult<()> {
        validate_quantity(quantity)?;

        debug!(id = %id, quantity, "Updating stock quantity");

        let result = sqlx::query(
            r#"
            UPDATE inventory_items SET quantity = ?1, updated_at = ?2
            WHERE id = ?3 AND owner_id = ?4
            "#,
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(id)
        .bind(self.owner.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InventoryItem", id));
        }
        Ok(())
    }

    /// Fetches `quantity, sale_price` of every item.
    pub async fn stock_levels(&self) -> DbResult<Vec<StockLevel>> {
        let rows = sqlx::query_as::<_, StockRow>(
            "SELECT quantity, sale_price FROM inventory_items WHERE owner_id = ?1",
        )
        .bind(self.owner.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(StockLevel {
                    quantity: row.quantity,
                    sale_price: decode_money("sale_price", &row.sale_price)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::setup;
    use rust_decimal_macros::dec;
    use xonter_core::{aggregate_inventory, Money, DEFAULT_UNIT};

    fn payload(name: &str, quantity: i64, sale: Money) -> NewInventoryItem {
        NewInventoryItem {
            name: name.to_string(),
            description: None,
            kind: ItemKind::Product,
            quantity,
            purchase_price: Money::from_major(10),
            sale_price: sale,
            unit: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_defaults_unit() {
        let (db, owner, _) = setup().await;
        let repo = db.inventory(&owner);

        let item = repo
            .insert(&payload("Paper", 3, Money::new(dec!(12.50))))
            .await
            .unwrap();
        assert_eq!(item.unit, DEFAULT_UNIT);

        let fetched = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(fetched.sale_price, Money::new(dec!(12.50)));
        assert_eq!(fetched.margin_percent(), dec!(25));
    }

    #[tokio::test]
    async fn test_stock_levels_feed_aggregation() {
        let (db, owner, _) = setup().await;
        let repo = db.inventory(&owner);

        repo.insert(&payload("Pens", 10, Money::from_major(25))).await.unwrap();
        repo.insert(&payload("Chairs", 3, Money::from_major(100))).await.unwrap();

        let summary = aggregate_inventory(&repo.stock_levels().await.unwrap());
        assert_eq!(summary.unit_count, 13);
        assert_eq!(summary.total_value, Money::from_major(550));
    }

    #[tokio::test]
    async fn test_update_quantity() {
        let (db, owner, other) = setup().await;
        let repo = db.inventory(&owner);
        let item = repo.insert(&payload("Pens", 10, Money::from_major(2))).await.unwrap();

        repo.update_quantity(&item.id, 4).await.unwrap();
        let fetched = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(fetched.quantity, 4);
        assert!(fetched.updated_at >= item.updated_at);

        assert!(matches!(
            repo.update_quantity(&item.id, -1).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            db.inventory(&other).update_quantity(&item.id, 99).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped() {
        let (db, alice, bob) = setup().await;
        db.inventory(&alice)
            .insert(&payload("Pens", 1, Money::from_major(2)))
            .await
            .unwrap();

        assert_eq!(db.inventory(&alice).list(InventoryFilter::all()).await.unwrap().len(), 1);
        assert!(db.inventory(&bob).list(InventoryFilter::all()).await.unwrap().is_empty());
        assert!(db.inventory(&bob).stock_levels().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_kind() {
        let (db, owner, _) = setup().await;
        let repo = db.inventory(&owner);

        repo.insert(&payload("Pens", 10, Money::from_major(2))).await.unwrap();
        repo.insert(&NewInventoryItem {
            kind: ItemKind::Service,
            quantity: 0,
            unit: "hour".to_string(),
            ..payload("Installation", 0, Money::from_major(80))
        })
        .await
        .unwrap();

        let all = repo.list(InventoryFilter::all()).await.unwrap();
        assert_eq!(all.len(), 2);

        let services = repo.list(InventoryFilter::only(ItemKind::Service)).await.unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "Installation");

        let products = repo.list(InventoryFilter::only(ItemKind::Product)).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Pens");
    }
}
