//! Customer repository.
//!
//! Audience resolution (`count_matching` / `find_matching`) always queries
//! the live table; segment membership is never cached or snapshotted before
//! fan-out time.

use chrono::{DateTime, Utc};
use sqlx::postgres::Postgres;
use sqlx::PgPool;
use uuid::Uuid;

use domain::services::segment::SegmentFilter;
use shared::validation::normalize_email;

use crate::entities::{CustomerEntity, CustomerSummaryEntity};
use crate::segment_sql::{render_filter, BindValue};

const CUSTOMER_COLUMNS: &str =
    "id, name, email, total_spend, visit_count, last_active_date, created_at, updated_at";

/// Repository for customer operations.
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a customer. The email is normalized to lowercase; a duplicate
    /// surfaces as a unique-violation database error.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        total_spend: f64,
        visit_count: i32,
        last_active_date: Option<DateTime<Utc>>,
    ) -> Result<CustomerEntity, sqlx::Error> {
        let entity = sqlx::query_as::<_, CustomerEntity>(&format!(
            r#"
            INSERT INTO customers (name, email, total_spend, visit_count, last_active_date)
            VALUES ($1, $2, $3, $4, COALESCE($5, NOW()))
            RETURNING {CUSTOMER_COLUMNS}
            "#,
        ))
        .bind(name.trim())
        .bind(normalize_email(email))
        .bind(total_spend)
        .bind(visit_count)
        .bind(last_active_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    /// All customers, newest first.
    pub async fn list(&self) -> Result<Vec<CustomerEntity>, sqlx::Error> {
        let entities = sqlx::query_as::<_, CustomerEntity>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            ORDER BY created_at DESC
            "#,
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entities)
    }

    /// Find a customer by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomerEntity>, sqlx::Error> {
        let entity = sqlx::query_as::<_, CustomerEntity>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity)
    }

    /// Count customers matching a compiled segment filter.
    pub async fn count_matching(&self, filter: &SegmentFilter) -> Result<i64, sqlx::Error> {
        let rendered = render_filter(filter);
        let sql = format!("SELECT COUNT(*) FROM customers{}", rendered.where_clause);

        let mut query = sqlx::query_scalar::<Postgres, i64>(&sql);
        for bind in &rendered.binds {
            query = bind_value(query, bind);
        }

        query.fetch_one(&self.pool).await
    }

    /// Resolve the id/name/email of every customer matching a filter.
    pub async fn find_matching(
        &self,
        filter: &SegmentFilter,
    ) -> Result<Vec<CustomerSummaryEntity>, sqlx::Error> {
        let rendered = render_filter(filter);
        let sql = format!(
            "SELECT id, name, email FROM customers{}",
            rendered.where_clause
        );

        let mut query = sqlx::query_as::<Postgres, CustomerSummaryEntity>(&sql);
        for bind in &rendered.binds {
            query = match bind {
                BindValue::Float(v) => query.bind(*v),
                BindValue::Timestamp(t) => query.bind(*t),
                BindValue::Text(s) => query.bind(s.clone()),
            };
        }

        query.fetch_all(&self.pool).await
    }
}

fn bind_value<'q>(
    query: sqlx::query::QueryScalar<'q, Postgres, i64, sqlx::postgres::PgArguments>,
    bind: &BindValue,
) -> sqlx::query::QueryScalar<'q, Postgres, i64, sqlx::postgres::PgArguments> {
    match bind {
        BindValue::Float(v) => query.bind(*v),
        BindValue::Timestamp(t) => query.bind(*t),
        BindValue::Text(s) => query.bind(s.clone()),
    }
}
