//! Stock projection: the "resulting stock" shown next to the quantity field.
//!
//! The backend is authoritative for the persisted stock; these functions only
//! drive the live preview before submission.

use std::str::FromStr;

use crate::movement::MovementDirection;

/// Resulting stock after moving `quantity` units in `direction`.
///
/// IN adds (saturating at `u32::MAX`); OUT subtracts and clamps at zero.
/// Pure and total.
pub fn project(current_stock: u32, direction: MovementDirection, quantity: u32) -> u32 {
    match direction {
        MovementDirection::In => current_stock.saturating_add(quantity),
        MovementDirection::Out => current_stock.saturating_sub(quantity),
    }
}

/// Preview straight from the quantity field while the user is typing.
///
/// Anything that is not a non-negative whole number counts as zero, so a
/// half-typed value leaves the preview at the current stock.
pub fn preview(current_stock: u32, direction: MovementDirection, quantity_text: &str) -> u32 {
    let quantity = u32::from_str(quantity_text.trim()).unwrap_or(0);
    project(current_stock, direction, quantity)
}
