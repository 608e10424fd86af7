use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockia_core::{DomainError, ProductId};

/// Direction of a stock movement.
///
/// `In` is an inbound purchase; `Out` is a sale or write-off.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementDirection {
    In,
    Out,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "IN",
            MovementDirection::Out => "OUT",
        }
    }
}

impl core::fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for MovementDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(MovementDirection::In),
            "out" => Ok(MovementDirection::Out),
            other => Err(DomainError::validation(format!(
                "movement direction must be IN or OUT, got {other:?}"
            ))),
        }
    }
}

/// A validated, not-yet-persisted inventory movement.
///
/// Only [`crate::MovementValidator`] builds these, so `quantity > 0` and
/// `purchase_cost >= 0` always hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryMovement {
    product_id: ProductId,
    direction: MovementDirection,
    quantity: u32,
    purchase_cost: Decimal,
    reason: Option<String>,
    supplier: Option<String>,
}

impl InventoryMovement {
    pub(crate) fn new(
        product_id: ProductId,
        direction: MovementDirection,
        quantity: u32,
        purchase_cost: Decimal,
        reason: Option<String>,
        supplier: Option<String>,
    ) -> Self {
        Self {
            product_id,
            direction,
            quantity,
            purchase_cost,
            reason,
            supplier,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn direction(&self) -> MovementDirection {
        self.direction
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn purchase_cost(&self) -> Decimal {
        self.purchase_cost
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn supplier(&self) -> Option<&str> {
        self.supplier.as_deref()
    }

    /// Locally previewed stock after this movement. Never authoritative.
    pub fn preview(&self, current_stock: u32) -> u32 {
        crate::project(current_stock, self.direction, self.quantity)
    }
}
