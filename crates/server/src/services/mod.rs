//! Application services.
//!
//! Services own the business workflows; route handlers stay thin and
//! translate service results into redirects and rendered pages.

pub mod auth;
pub mod reporting;
pub mod stock;
pub mod uploads;

pub use auth::AuthService;
pub use reporting::ReportingService;
pub use stock::StockService;
pub use uploads::PhotoStore;
