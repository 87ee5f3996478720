//! Campaign pipeline services and external integrations.

pub mod campaign_launch;
pub mod dispatcher;
pub mod text_generation;
pub mod vendor_sim;

pub use campaign_launch::{CampaignLauncher, LaunchOutcome};
pub use dispatcher::{DeliveryDispatcher, DispatchItem};
pub use text_generation::TextGenerationClient;
pub use vendor_sim::VendorSimulator;
