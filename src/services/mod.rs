pub mod banner_actor;
pub mod events;
pub mod metrics;
pub mod registry;
pub mod subscribers;
