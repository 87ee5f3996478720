//! Order repository.
//!
//! Recording an order also folds its amount into the customer's
//! segmentation attributes; both writes happen in one transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{OrderEntity, OrderWithCustomerEntity};

/// Repository for order operations.
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and update the customer's total_spend, visit_count
    /// and last_active_date atomically. Fails with `RowNotFound` when the
    /// customer does not exist.
    pub async fn create(
        &self,
        customer_id: Uuid,
        amount: f64,
        order_date: Option<DateTime<Utc>>,
    ) -> Result<OrderEntity, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, OrderEntity>(
            r#"
            INSERT INTO orders (customer_id, amount, order_date)
            VALUES ($1, $2, COALESCE($3, NOW()))
            RETURNING id, customer_id, amount, order_date, created_at
            "#,
        )
        .bind(customer_id)
        .bind(amount)
        .bind(order_date)
        .fetch_one(&mut *tx)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE customers
            SET total_spend = total_spend + $2,
                visit_count = visit_count + 1,
                last_active_date = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(customer_id)
        .bind(amount)
        .bind(order.order_date)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Customer vanished between the FK check and the update; the
            // rollback also discards the order row.
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;
        Ok(order)
    }

    /// All orders, newest first, with the customer's name and email.
    pub async fn list(&self) -> Result<Vec<OrderWithCustomerEntity>, sqlx::Error> {
        let entities = sqlx::query_as::<_, OrderWithCustomerEntity>(
            r#"
            SELECT o.id, o.customer_id, o.amount, o.order_date, o.created_at,
                   c.name AS customer_name, c.email AS customer_email
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            ORDER BY o.order_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entities)
    }
}
