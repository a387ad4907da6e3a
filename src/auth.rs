//! Shopee identifiers, secrets, and per-shop token models.

pub mod id;
pub mod token;

pub use id::*;
pub use token::{record::*, secret::*};
