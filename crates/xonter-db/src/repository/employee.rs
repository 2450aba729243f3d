//! # Employee Repository
//!
//! Database operations for employees. Employees are never deleted; they are
//! switched between active and inactive.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use xonter_core::{Employee, Headcount, NewEmployee, OwnerId, MAX_LIST_ROWS};

use super::{clean_optional, decode_money, decode_owner, encode_money, new_id};
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: String,
    owner_id: String,
    name: String,
    position: String,
    salary: String,
    email: Option<String>,
    phone: Option<String>,
    hired_on: NaiveDate,
    active: bool,
    created_at: DateTime<Utc>,
}

impl EmployeeRow {
    fn into_employee(self) -> DbResult<Employee> {
        Ok(Employee {
            salary: decode_money("salary", &self.salary)?,
            owner_id: decode_owner(&self.owner_id)?,
            id: self.id,
            name: self.name,
            position: self.position,
            email: self.email,
            phone: self.phone,
            hired_on: self.hired_on,
            active: self.active,
            created_at: self.created_at,
        })
    }
}

/// Repository for one owner's employees.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
    owner: OwnerId,
}

impl EmployeeRepository {
    /// Creates a repository bound to `owner`.
    pub fn new(pool: SqlitePool, owner: OwnerId) -> Self {
        EmployeeRepository { pool, owner }
    }

    /// Validates and stores a new, active employee.
    pub async fn insert(&self, payload: &NewEmployee) -> DbResult<Employee> {
        payload.validate()?;

        let employee = Employee {
            id: new_id(),
            owner_id: self.owner.clone(),
            name: payload.name.trim().to_string(),
            position: payload.position.trim().to_string(),
            salary: payload.salary,
            email: clean_optional(&payload.email),
            phone: clean_optional(&payload.phone),
            hired_on: payload.hired_on,
            active: true,
            created_at: Utc::now(),
        };

        debug!(id = %employee.id, name = %employee.name, "Inserting employee");

        sqlx::query(
            r#"
            INSERT INTO employees (
                id, owner_id, name, position, salary, email, phone, hired_on, active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&employee.id)
        .bind(self.owner.as_str())
        .bind(&employee.name)
        .bind(&employee.position)
        .bind(encode_money(employee.salary))
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(employee.hired_on)
        .bind(employee.active)
        .bind(employee.created_at)
        .execute(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Lists all employees, most recently added first.
    pub async fn list(&self) -> DbResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, owner_id, name, position, salary, email, phone, hired_on, active, created_at
            FROM employees
            WHERE owner_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(self.owner.as_str())
        .bind(MAX_LIST_ROWS)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EmployeeRow::into_employee).collect()
    }

    /// Sets the active flag.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such employee for this owner
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        debug!(id = %id, active, "Setting employee status");

        let result = sqlx::query("UPDATE employees SET active = ?1 WHERE id = ?2 AND owner_id = ?3")
            .bind(active)
            .bind(id)
            .bind(self.owner.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", id));
        }
        Ok(())
    }

    /// Flips the active flag and returns the new value.
    pub async fn toggle_active(&self, id: &str) -> DbResult<bool> {
        let active: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE employees SET active = NOT active
            WHERE id = ?1 AND owner_id = ?2
            RETURNING active
            "#,
        )
        .bind(id)
        .bind(self.owner.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let active = active.ok_or_else(|| DbError::not_found("Employee", id))?;
        debug!(id = %id, active, "Toggled employee status");
        Ok(active)
    }

    /// Total and active employee counts.
    pub async fn headcount(&self) -> DbResult<Headcount> {
        let (total, active): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(active), 0)
            FROM employees
            WHERE owner_id = ?1
            "#,
        )
        .bind(self.owner.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(Headcount { total, active })
    }
}
