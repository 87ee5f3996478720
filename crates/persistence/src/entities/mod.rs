//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod campaign;
pub mod customer;
pub mod delivery_record;
pub mod order;

pub use campaign::{CampaignEntity, CampaignWithStatsEntity};
pub use customer::{CustomerEntity, CustomerSummaryEntity};
pub use delivery_record::{DeliveryRecordEntity, DeliveryStatsEntity};
pub use order::{OrderEntity, OrderWithCustomerEntity};
