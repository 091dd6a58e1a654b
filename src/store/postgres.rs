//! PostgreSQL store via sqlx, plus startup DDL.

use super::{phone_conflict, CustomerStore};
use crate::error::{AppError, ConfigError};
use crate::model::{Customer, CustomerChanges, NewCustomer, CUSTOMERS_TABLE};
use async_trait::async_trait;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

const COLUMNS: &str = "id, name, phone, area, created_at";

#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Create the customers table if it does not exist. Safe to run on every start.
pub async fn ensure_customer_table(pool: &PgPool) -> Result<(), AppError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id SERIAL PRIMARY KEY,
            name VARCHAR(50) NOT NULL,
            phone VARCHAR(15) NOT NULL UNIQUE,
            area VARCHAR(30) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        CUSTOMERS_TABLE
    );
    tracing::debug!(sql = %ddl, "ddl");
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

/// Create the target database if missing, connecting through the `postgres` maintenance database.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|_| invalid_url(database_url))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| invalid_url(url))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres{}", base, query);
    Ok((admin_url, db_name.to_string()))
}

fn invalid_url(url: &str) -> AppError {
    AppError::Config(ConfigError::Invalid {
        var: "DATABASE_URL",
        value: redact_credentials(url),
    })
}

/// Hide `user:password` before the URL ends up in an error message.
fn redact_credentials(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => format!("{}***{}", &url[..scheme + 3], &url[at..]),
        _ => url.to_string(),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Build an ILIKE pattern that matches `term` literally anywhere in the value.
fn contains_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn map_write_error(e: sqlx::Error, phone: Option<&str>) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return phone_conflict(phone.unwrap_or_default());
        }
    }
    AppError::Db(e)
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn insert(&self, new: &NewCustomer) -> Result<Customer, AppError> {
        let sql = format!(
            "INSERT INTO {} (name, phone, area) VALUES ($1, $2, $3) RETURNING {}",
            CUSTOMERS_TABLE, COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        sqlx::query_as::<_, Customer>(&sql)
            .bind(&new.name)
            .bind(&new.phone)
            .bind(&new.area)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, Some(new.phone.as_str())))
    }

    async fn get(&self, id: i32) -> Result<Option<Customer>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, CUSTOMERS_TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE phone = $1", COLUMNS, CUSTOMERS_TABLE);
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, Customer>(&sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Customer>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id LIMIT $1 OFFSET $2",
            COLUMNS, CUSTOMERS_TABLE
        );
        tracing::debug!(sql = %sql, skip, limit, "query");
        let rows = sqlx::query_as::<_, Customer>(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Customer>, AppError> {
        let sql = format!(
            r"SELECT {} FROM {} WHERE name ILIKE $1 ESCAPE '\' ORDER BY id",
            COLUMNS, CUSTOMERS_TABLE
        );
        let pattern = contains_pattern(term);
        tracing::debug!(sql = %sql, pattern = %pattern, "query");
        let rows = sqlx::query_as::<_, Customer>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(&self, id: i32, changes: &CustomerChanges) -> Result<Option<Customer>, AppError> {
        if changes.is_empty() {
            return self.get(id).await;
        }
        let sql = format!(
            "UPDATE {} SET name = COALESCE($2, name), phone = COALESCE($3, phone), area = COALESCE($4, area) \
             WHERE id = $1 RETURNING {}",
            CUSTOMERS_TABLE, COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.phone.as_deref())
            .bind(changes.area.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, changes.phone.as_deref()))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", CUSTOMERS_TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", CUSTOMERS_TABLE);
        let n: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(n)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
