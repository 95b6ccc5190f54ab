//! Plain data records for the storefront.
//!
//! Rows come out of the repositories as these structs; no ORM change
//! tracking, every write is an explicit repository call.

pub mod album;
pub mod cart;
pub mod session;
pub mod user;

pub use album::Album;
pub use cart::{CartItem, CartLine};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
