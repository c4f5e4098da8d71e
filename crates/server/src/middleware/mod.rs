//! HTTP middleware: sessions and authentication extractors.

pub mod auth;
pub mod session;

pub use auth::{
    AdminOnly, AnyRole, RequireRole, RolePolicy, SellAccess, StockAccess, clear_current_user,
    set_current_user,
};
pub use session::create_session_layer;
