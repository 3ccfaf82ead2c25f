//! Device models for the microgrid: producers, consumers, and storage.

/// Bounded, rate-limited battery storage.
pub mod battery;
/// Household and industry load profiles.
pub mod consumer;
/// Solar, wind, and main-grid generation.
pub mod producer;
pub mod types;

// Re-export the main types for convenience
pub use battery::Battery;
pub use consumer::Consumer;
pub use producer::Producer;
pub use types::{ConsumerKind, Device, DeviceId, ProducerKind};
