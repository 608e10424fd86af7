use serde::{Deserialize, Serialize};

use stockia_core::{
    CustomerId, Entity, FieldError, FieldErrorKind, FieldSpec, FormSchema, FormValues, InputKind,
    Rule,
};

pub mod fields {
    use stockia_core::FieldId;

    pub const NAME: FieldId = FieldId::new("name");
    pub const EMAIL: FieldId = FieldId::new("email");
    pub const PHONE: FieldId = FieldId::new("phone");
    pub const FREQUENT: FieldId = FieldId::new("isFrequent");
}

/// A customer (`/api/clients` on the backend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub is_frequent: bool,
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}

pub fn customer_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldSpec::new(
            fields::NAME,
            "Name",
            Rule::Text {
                required: true,
                min_len: None,
                max_len: Some(100),
            },
            InputKind::Text,
        ),
        FieldSpec::new(
            fields::EMAIL,
            "Email",
            Rule::Email { required: true },
            InputKind::Email,
        ),
        FieldSpec::new(
            fields::PHONE,
            "Phone",
            Rule::Phone { required: true },
            InputKind::Phone,
        ),
        FieldSpec::new(
            fields::FREQUENT,
            "Frequent customer",
            Rule::Flag,
            InputKind::Checkbox,
        ),
    ])
}

/// Body of `POST /api/clients` and `PUT /api/clients/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_frequent: bool,
}

impl CustomerRequest {
    pub fn from_form(values: &FormValues) -> Result<Self, Vec<FieldError>> {
        let form = customer_schema().validate(values)?;
        let text = |field| {
            form.text(field)
                .map(str::to_string)
                .ok_or_else(|| vec![FieldError::new(field, FieldErrorKind::Required)])
        };

        Ok(Self {
            name: text(fields::NAME)?,
            email: text(fields::EMAIL)?,
            phone: text(fields::PHONE)?,
            is_frequent: form.flag(fields::FREQUENT),
        })
    }
}

impl From<&Customer> for CustomerRequest {
    fn from(c: &Customer) -> Self {
        Self {
            name: c.name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            is_frequent: c.is_frequent,
        }
    }
}

/// Parameters of `GET /api/clients`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerQuery {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl Default for CustomerQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            search: None,
            sort: None,
        }
    }
}

impl CustomerQuery {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into()).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs
    }
}
