//! Domain types for the server.

pub mod catalog;
pub mod sale;
pub mod session;
pub mod user;

pub use catalog::{Category, CategoryStock, Product, ProductListing};
pub use sale::{SaleDraft, SaleLine};
pub use session::{CurrentUser, session_keys};
pub use user::User;
