pub mod cache;
pub mod email;
pub mod events;
pub mod features;
pub mod lifecycle;
pub mod store;
pub mod throttle;
