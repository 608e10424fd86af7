use serde::{Deserialize, Serialize};

use stockia_core::{CategoryId, Entity};

/// A category as listed by `GET /api/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub product_count: Option<u64>,
}

fn active_by_default() -> bool {
    true
}

impl Category {
    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef {
            id: Some(self.id),
            name: self.name.clone(),
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}

/// The category embedded in a product record.
///
/// Some endpoints send the full category object, older ones only its name;
/// both decode into this type (`id` is `None` for the bare-name form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CategoryWire")]
pub struct CategoryRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryWire {
    Name(String),
    Record {
        #[serde(default)]
        id: Option<CategoryId>,
        #[serde(default)]
        name: String,
    },
}

impl From<CategoryWire> for CategoryRef {
    fn from(wire: CategoryWire) -> Self {
        match wire {
            CategoryWire::Name(name) => CategoryRef { id: None, name },
            CategoryWire::Record { id, name } => CategoryRef { id, name },
        }
    }
}
