//! Business services built on the repositories.
//!
//! - [`cart`] - Cart operations (add, remove, totals, sign-in migration)
//! - [`identity`] - Cart identifier resolution from the session
//! - [`antiforgery`] - Double-submit anti-forgery token
//! - [`auth`] - Password authentication

pub mod antiforgery;
pub mod auth;
pub mod cart;
pub mod identity;
