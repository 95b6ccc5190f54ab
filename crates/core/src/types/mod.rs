//! Core types for Spindle.
//!
//! Type-safe wrappers for the domain concepts shared between the storefront
//! and the CLI: entity IDs, money, and email addresses.

mod email;
mod id;
mod price;

pub use email::{Email, EmailError};
pub use id::{AlbumId, CartItemId, UserId};
pub use price::Price;
