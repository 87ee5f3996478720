//! Domain model definitions.

pub mod campaign;
pub mod customer;
pub mod delivery_record;
pub mod order;
pub mod rule;

pub use campaign::{Campaign, CampaignStatus, CampaignWithStats, LaunchCampaignRequest};
pub use customer::{CreateCustomerRequest, Customer, CustomerSummary};
pub use delivery_record::{DeliveryRecord, DeliveryStatus};
pub use order::{CreateOrderRequest, Order};
pub use rule::{Rule, RuleOperator, RuleValue};
