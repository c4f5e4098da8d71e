//! Sales ledger domain types.
//!
//! Ledger entries are append-only. Line items snapshot the product at
//! sale time and are deliberately decoupled from later product edits.

use rust_decimal::Decimal;

use bodega_core::ProductId;

/// A line item to record in the ledger.
#[derive(Debug, Clone)]
pub struct SaleLine {
    /// Product sold (snapshot reference, no foreign key).
    pub product_id: ProductId,
    /// Product name at sale time.
    pub name: String,
    /// Unit price at sale time.
    pub unit_price: Decimal,
    /// Units sold.
    pub quantity: i32,
    /// `unit_price * quantity`.
    pub subtotal: Decimal,
}

/// A sale about to be appended to the ledger.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    /// Ordered line items.
    pub items: Vec<SaleLine>,
    /// Sum of all subtotals.
    pub total_amount: Decimal,
}

impl SaleDraft {
    /// Build a single-line sale from a product snapshot.
    #[must_use]
    pub fn single(product_id: ProductId, name: String, unit_price: Decimal, quantity: i32) -> Self {
        let subtotal = unit_price * Decimal::from(quantity);
        Self {
            items: vec![SaleLine {
                product_id,
                name,
                unit_price,
                quantity,
                subtotal,
            }],
            total_amount: subtotal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_totals() {
        let draft = SaleDraft::single(
            ProductId::new(9),
            "Botana".to_string(),
            Decimal::new(1250, 2),
            3,
        );
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.total_amount, Decimal::new(3750, 2));
        assert_eq!(draft.items[0].subtotal, draft.total_amount);
    }
}
