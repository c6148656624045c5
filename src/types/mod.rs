//! Core type definitions using newtype patterns for type safety.
//!
//! A `Subnet` can only ever hold a canonical /24, so every consumer
//! downstream of normalization can rely on that shape.

mod instance;
mod subnet;

pub use instance::Instance;
pub use subnet::{expand_subnet, normalize_subnet, Subnet, HOSTS_PER_SUBNET};
