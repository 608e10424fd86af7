//! Request/response bodies that only the HTTP layer needs.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockia_core::{MovementId, ProductId, UserId};
use stockia_inventory::{InventoryMovement, MovementDirection};

use crate::session::SessionUser;

/// Body of the movement-creation call.
///
/// The supplier typed in the adjustment form is informational only and is
/// not part of the wire body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    pub product_id: ProductId,
    pub movement_type: MovementDirection,
    pub quantity: u32,
    pub reason: Option<String>,
    /// Sent for IN movements only; OUT carries `null`.
    pub purchase_cost: Option<Decimal>,
}

impl From<&InventoryMovement> for MovementRequest {
    fn from(m: &InventoryMovement) -> Self {
        let purchase_cost = match m.direction() {
            MovementDirection::In => Some(m.purchase_cost()),
            MovementDirection::Out => None,
        };
        Self {
            product_id: m.product_id(),
            movement_type: m.direction(),
            quantity: m.quantity(),
            reason: m.reason().map(str::to_string),
            purchase_cost,
        }
    }
}

/// A stored movement as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedMovement {
    pub id: MovementId,
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: Option<String>,
    pub movement_type: MovementDirection,
    pub quantity: u32,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub new_stock: Option<u32>,
    #[serde(default)]
    pub purchase_cost: Option<Decimal>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: SessionUser,
}
