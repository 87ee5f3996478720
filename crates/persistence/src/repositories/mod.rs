//! Repository implementations for database operations.

pub mod campaign;
pub mod customer;
pub mod delivery_record;
pub mod order;

pub use campaign::CampaignRepository;
pub use customer::CustomerRepository;
pub use delivery_record::DeliveryRecordRepository;
pub use order::OrderRepository;
