//! Movement validation for the stock-adjustment form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockia_core::{
    DomainError, FieldError, FieldErrorKind, FieldSpec, FormSchema, FormValues, InputKind,
    ProductId, Rule,
};

use crate::movement::{InventoryMovement, MovementDirection};

/// Field identifiers of the adjustment form.
pub mod fields {
    use stockia_core::FieldId;

    pub const QUANTITY: FieldId = FieldId::new("quantity");
    pub const COST: FieldId = FieldId::new("cost");
    pub const SUPPLIER: FieldId = FieldId::new("supplier");
    pub const REASON: FieldId = FieldId::new("reason");
}

const MAX_SUPPLIER_LEN: usize = 100;
const MAX_REASON_LEN: usize = 255;

/// What to do with an OUT movement larger than the current stock.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockPolicy {
    /// Reject it on the quantity field (`QuantityExceedsStock`).
    #[default]
    Block,
    /// Accept it; the preview clamps the resulting stock at zero and the
    /// backend decides.
    Clamp,
}

impl core::str::FromStr for StockPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(StockPolicy::Block),
            "clamp" => Ok(StockPolicy::Clamp),
            other => Err(DomainError::validation(format!(
                "stock policy must be block or clamp, got {other:?}"
            ))),
        }
    }
}

/// Field table of the adjustment form.
pub fn movement_schema() -> FormSchema {
    FormSchema::new(vec![
        quantity_spec(),
        FieldSpec::new(
            fields::COST,
            "Purchase cost",
            Rule::Decimal {
                required: true,
                min: Some(Decimal::ZERO),
                max: Some(Decimal::new(9_999_999_999, 2)),
            },
            InputKind::Decimal,
        ),
        FieldSpec::new(
            fields::SUPPLIER,
            "Supplier",
            Rule::Text {
                required: false,
                min_len: None,
                max_len: Some(MAX_SUPPLIER_LEN),
            },
            InputKind::Text,
        ),
        FieldSpec::new(
            fields::REASON,
            "Reason / notes",
            Rule::Text {
                required: false,
                min_len: None,
                max_len: Some(MAX_REASON_LEN),
            },
            InputKind::TextArea,
        ),
    ])
}

fn quantity_spec() -> FieldSpec {
    FieldSpec::new(
        fields::QUANTITY,
        "Quantity",
        Rule::Integer {
            required: true,
            min: Some(1),
            max: Some(i64::from(u32::MAX)),
        },
        InputKind::Integer,
    )
}

/// Raw adjustment form, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementForm {
    pub direction: MovementDirection,
    pub quantity: Option<String>,
    pub cost: Option<String>,
    pub supplier: Option<String>,
    pub reason: Option<String>,
}

impl MovementForm {
    pub fn new(direction: MovementDirection) -> Self {
        Self {
            direction,
            quantity: None,
            cost: None,
            supplier: None,
            reason: None,
        }
    }

    pub fn quantity(mut self, value: impl Into<String>) -> Self {
        self.quantity = Some(value.into());
        self
    }

    pub fn cost(mut self, value: impl Into<String>) -> Self {
        self.cost = Some(value.into());
        self
    }

    pub fn supplier(mut self, value: impl Into<String>) -> Self {
        self.supplier = Some(value.into());
        self
    }

    pub fn reason(mut self, value: impl Into<String>) -> Self {
        self.reason = Some(value.into());
        self
    }

    fn values(&self) -> FormValues {
        let mut values = FormValues::new();
        let pairs = [
            (fields::QUANTITY, &self.quantity),
            (fields::COST, &self.cost),
            (fields::SUPPLIER, &self.supplier),
            (fields::REASON, &self.reason),
        ];
        for (field, value) in pairs {
            if let Some(v) = value {
                values.set(field, v.clone());
            }
        }
        values
    }
}

/// Validates adjustment forms against a product's current stock.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MovementValidator {
    policy: StockPolicy,
}

impl MovementValidator {
    pub fn new(policy: StockPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> StockPolicy {
        self.policy
    }

    /// Accept the form as a movement or report every failing field.
    pub fn validate(
        &self,
        product_id: ProductId,
        form: &MovementForm,
        current_stock: u32,
    ) -> Result<InventoryMovement, Vec<FieldError>> {
        let values = form.values();

        let valid = match movement_schema().validate(&values) {
            Ok(valid) => valid,
            Err(mut errors) => {
                let quantity_failed = errors.iter().any(|e| e.field == fields::QUANTITY);
                if !quantity_failed {
                    if let Some(quantity) = parse_quantity(&values) {
                        errors.extend(self.check_stock(form.direction, quantity, current_stock));
                    }
                }
                return Err(errors);
            }
        };

        let (Some(quantity), Some(cost)) = (
            valid.integer(fields::QUANTITY).and_then(|q| u32::try_from(q).ok()),
            valid.decimal(fields::COST),
        ) else {
            return Err(vec![FieldError::new(fields::QUANTITY, FieldErrorKind::NotANumber)]);
        };

        if let Some(err) = self.check_stock(form.direction, quantity, current_stock) {
            return Err(vec![err]);
        }

        Ok(InventoryMovement::new(
            product_id,
            form.direction,
            quantity,
            cost,
            valid.text(fields::REASON).map(str::to_string),
            valid.text(fields::SUPPLIER).map(str::to_string),
        ))
    }

    fn check_stock(
        &self,
        direction: MovementDirection,
        quantity: u32,
        current_stock: u32,
    ) -> Option<FieldError> {
        let exceeds = direction == MovementDirection::Out && quantity > current_stock;
        (exceeds && self.policy == StockPolicy::Block).then(|| {
            FieldError::new(
                fields::QUANTITY,
                FieldErrorKind::QuantityExceedsStock {
                    requested: quantity,
                    available: current_stock,
                },
            )
        })
    }
}

fn parse_quantity(values: &FormValues) -> Option<u32> {
    FormSchema::new(vec![quantity_spec()])
        .validate(values)
        .ok()
        .and_then(|v| v.integer(fields::QUANTITY))
        .and_then(|q| u32::try_from(q).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockia_core::FieldId;

    fn product() -> ProductId {
        ProductId::new()
    }

    fn kinds(errors: &[FieldError], field: FieldId) -> Vec<FieldErrorKind> {
        errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.kind.clone())
            .collect()
    }

    #[test]
    fn rejects_zero_and_negative_quantity_in_both_directions() {
        let validator = MovementValidator::default();
        for direction in [MovementDirection::In, MovementDirection::Out] {
            for qty in ["0", "-1"] {
                let form = MovementForm::new(direction).quantity(qty).cost("0");
                let errors = validator.validate(product(), &form, 100).unwrap_err();
                assert_eq!(
                    kinds(&errors, fields::QUANTITY),
                    vec![FieldErrorKind::BelowMinimum { min: "1".into() }],
                    "direction {direction} quantity {qty}"
                );
            }
        }
    }

    #[test]
    fn rejects_missing_and_fractional_quantity() {
        let validator = MovementValidator::default();
        let missing = MovementForm::new(MovementDirection::In).cost("1");
        let errors = validator.validate(product(), &missing, 0).unwrap_err();
        assert_eq!(kinds(&errors, fields::QUANTITY), vec![FieldErrorKind::Required]);

        let fractional = MovementForm::new(MovementDirection::In).quantity("1.5").cost("1");
        let errors = validator.validate(product(), &fractional, 0).unwrap_err();
        assert_eq!(kinds(&errors, fields::QUANTITY), vec![FieldErrorKind::NotAnInteger]);
    }

    #[test]
    fn rejects_negative_cost_and_accepts_zero_cost() {
        let validator = MovementValidator::default();
        let negative = MovementForm::new(MovementDirection::In).quantity("1").cost("-1");
        let errors = validator.validate(product(), &negative, 0).unwrap_err();
        assert_eq!(
            kinds(&errors, fields::COST),
            vec![FieldErrorKind::BelowMinimum { min: "0".into() }]
        );

        let zero = MovementForm::new(MovementDirection::In).quantity("1").cost("0");
        let movement = validator.validate(product(), &zero, 0).unwrap();
        assert_eq!(movement.purchase_cost(), Decimal::ZERO);
    }

    #[test]
    fn rejects_missing_or_non_numeric_cost() {
        let validator = MovementValidator::default();
        let missing = MovementForm::new(MovementDirection::In).quantity("1");
        let errors = validator.validate(product(), &missing, 0).unwrap_err();
        assert_eq!(kinds(&errors, fields::COST), vec![FieldErrorKind::Required]);

        let garbage = MovementForm::new(MovementDirection::In).quantity("1").cost("cheap");
        let errors = validator.validate(product(), &garbage, 0).unwrap_err();
        assert_eq!(kinds(&errors, fields::COST), vec![FieldErrorKind::NotANumber]);
    }

    #[test]
    fn out_five_from_twenty_previews_fifteen() {
        let id = product();
        let form = MovementForm::new(MovementDirection::Out).quantity("5").cost("0");
        let movement = MovementValidator::default().validate(id, &form, 20).unwrap();
        assert_eq!(movement.product_id(), id);
        assert_eq!(movement.quantity(), 5);
        assert_eq!(movement.preview(20), 15);
    }

    #[test]
    fn blocking_policy_rejects_over_withdrawal() {
        let form = MovementForm::new(MovementDirection::Out).quantity("10").cost("0");
        let errors = MovementValidator::new(StockPolicy::Block)
            .validate(product(), &form, 3)
            .unwrap_err();
        assert_eq!(
            kinds(&errors, fields::QUANTITY),
            vec![FieldErrorKind::QuantityExceedsStock {
                requested: 10,
                available: 3
            }]
        );
    }

    #[test]
    fn clamping_policy_accepts_over_withdrawal_and_previews_zero() {
        let form = MovementForm::new(MovementDirection::Out).quantity("10").cost("0");
        let movement = MovementValidator::new(StockPolicy::Clamp)
            .validate(product(), &form, 3)
            .unwrap();
        assert_eq!(movement.preview(3), 0);
    }

    #[test]
    fn inbound_is_never_limited_by_stock() {
        let form = MovementForm::new(MovementDirection::In).quantity("500").cost("2.50");
        let movement = MovementValidator::default().validate(product(), &form, 0).unwrap();
        assert_eq!(movement.preview(0), 500);
    }

    #[test]
    fn stock_error_is_reported_alongside_other_field_errors() {
        let form = MovementForm::new(MovementDirection::Out).quantity("10").cost("-5");
        let errors = MovementValidator::default()
            .validate(product(), &form, 3)
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            kinds(&errors, fields::QUANTITY)[..],
            [FieldErrorKind::QuantityExceedsStock { .. }]
        ));
    }

    #[test]
    fn optional_text_is_trimmed_and_limited() {
        let form = MovementForm::new(MovementDirection::In)
            .quantity("2")
            .cost("10")
            .supplier("  Distribuidora del Norte ")
            .reason("   ");
        let movement = MovementValidator::default().validate(product(), &form, 0).unwrap();
        assert_eq!(movement.supplier(), Some("Distribuidora del Norte"));
        assert_eq!(movement.reason(), None);

        let long = MovementForm::new(MovementDirection::In)
            .quantity("2")
            .cost("10")
            .reason("x".repeat(MAX_REASON_LEN + 1));
        let errors = MovementValidator::default()
            .validate(product(), &long, 0)
            .unwrap_err();
        assert_eq!(
            kinds(&errors, fields::REASON),
            vec![FieldErrorKind::TooLong { max: MAX_REASON_LEN }]
        );
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("block".parse::<StockPolicy>().unwrap(), StockPolicy::Block);
        assert_eq!("CLAMP".parse::<StockPolicy>().unwrap(), StockPolicy::Clamp);
        assert!("ignore".parse::<StockPolicy>().is_err());
    }
}
