//! Common types used across the application.

pub mod currency;
pub mod id;
pub mod pagination;

pub use currency::{AMOUNT_SCALE, Currency, RATE_SCALE};
pub use id::*;
pub use pagination::{PageMeta, PageRequest, PageResponse};
