//! Customer entity definitions.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Customer, CustomerSummary};

/// Database entity for the customers table.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub total_spend: f64,
    pub visit_count: i32,
    pub last_active_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomerEntity> for Customer {
    fn from(e: CustomerEntity) -> Self {
        Customer {
            id: e.id,
            name: e.name,
            email: e.email,
            total_spend: e.total_spend,
            visit_count: e.visit_count,
            last_active_date: e.last_active_date,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Slim projection used by campaign fan-out.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerSummaryEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<CustomerSummaryEntity> for CustomerSummary {
    fn from(e: CustomerSummaryEntity) -> Self {
        CustomerSummary {
            id: e.id,
            name: e.name,
            email: e.email,
        }
    }
}
