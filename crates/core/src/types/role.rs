//! User roles and their permission levels.

use serde::{Deserialize, Serialize};

/// User role with different permission levels.
///
/// Stored in `PostgreSQL` as the `user_role` enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including user management and deletions.
    Administrator,
    /// Manages categories, products, and restocking.
    StockKeeper,
    /// Records sales at the point of sale.
    Seller,
}

impl Role {
    /// Whether this is the administrator role.
    #[must_use]
    pub const fn is_administrator(self) -> bool {
        matches!(self, Self::Administrator)
    }

    /// Whether this role may manage stock (create products, restock).
    #[must_use]
    pub const fn can_manage_stock(self) -> bool {
        matches!(self, Self::Administrator | Self::StockKeeper)
    }

    /// Whether this role may record sales.
    #[must_use]
    pub const fn can_sell(self) -> bool {
        matches!(self, Self::Administrator | Self::Seller)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Administrator => write!(f, "administrator"),
            Self::StockKeeper => write!(f, "stock_keeper"),
            Self::Seller => write!(f, "seller"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(Self::Administrator),
            "stock_keeper" => Ok(Self::StockKeeper),
            "seller" => Ok(Self::Seller),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_parse_display_roundtrip() {
        for role in [Role::Administrator, Role::StockKeeper, Role::Seller] {
            let parsed = Role::from_str(&role.to_string()).expect("roundtrip");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_parse_invalid() {
        assert!(Role::from_str("wizard").is_err());
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Administrator.can_manage_stock());
        assert!(Role::Administrator.can_sell());
        assert!(Role::StockKeeper.can_manage_stock());
        assert!(!Role::StockKeeper.can_sell());
        assert!(!Role::Seller.can_manage_stock());
        assert!(Role::Seller.can_sell());
    }
}
