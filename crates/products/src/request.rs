use rust_decimal::Decimal;
use serde::Serialize;

use stockia_core::{
    CategoryId, FieldError, FieldErrorKind, FieldId, FieldSpec, FormSchema, FormValues,
    InputKind, Rule,
};

pub mod fields {
    use stockia_core::FieldId;

    pub const NAME: FieldId = FieldId::new("name");
    pub const CATEGORY: FieldId = FieldId::new("categoryId");
    pub const PRICE: FieldId = FieldId::new("price");
    pub const MIN_STOCK: FieldId = FieldId::new("minStock");
    pub const PHOTO_URL: FieldId = FieldId::new("photoUrl");
}

/// Field table of the create/edit product form.
pub fn product_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldSpec::new(
            fields::NAME,
            "Name",
            Rule::Text {
                required: true,
                min_len: Some(3),
                max_len: Some(100),
            },
            InputKind::Text,
        ),
        FieldSpec::new(
            fields::CATEGORY,
            "Category",
            Rule::Reference { required: true },
            InputKind::Select,
        ),
        FieldSpec::new(
            fields::PRICE,
            "Price",
            Rule::Decimal {
                required: true,
                min: Some(Decimal::new(1, 2)),
                max: Some(Decimal::new(9_999_999_999, 2)),
            },
            InputKind::Decimal,
        ),
        FieldSpec::new(
            fields::MIN_STOCK,
            "Minimum stock",
            Rule::Integer {
                required: true,
                min: Some(1),
                max: Some(99),
            },
            InputKind::Integer,
        ),
        FieldSpec::new(
            fields::PHOTO_URL,
            "Photo URL",
            Rule::Url { required: false },
            InputKind::Url,
        ),
    ])
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub category_id: CategoryId,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub min_stock: u32,
}

impl ProductRequest {
    pub fn from_form(values: &FormValues) -> Result<Self, Vec<FieldError>> {
        let form = product_schema().validate(values)?;

        let name = form.text(fields::NAME).map(str::to_string);
        let category_id = form.reference(fields::CATEGORY).map(CategoryId::from_uuid);
        let price = form.decimal(fields::PRICE);
        let min_stock = form
            .integer(fields::MIN_STOCK)
            .and_then(|v| u32::try_from(v).ok());

        match (name, category_id, price, min_stock) {
            (Some(name), Some(category_id), Some(price), Some(min_stock)) => Ok(Self {
                name,
                category_id,
                price,
                photo_url: form.text(fields::PHOTO_URL).map(str::to_string),
                min_stock,
            }),
            _ => Err(vec![missing(fields::NAME)]),
        }
    }
}

// Only reachable if the schema and the extraction above disagree.
fn missing(field: FieldId) -> FieldError {
    FieldError::new(field, FieldErrorKind::Required)
}
