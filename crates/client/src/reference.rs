//! Read-mostly reference data: categories, customers and suppliers.

use stockia_core::{CategoryId, CustomerId, Entity, SupplierId};
use stockia_parties::{Customer, Supplier};
use stockia_products::Category;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    categories: Vec<Category>,
    customers: Vec<Customer>,
    suppliers: Vec<Supplier>,
    loaded: bool,
}

impl ReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once a full load has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn replace_all(
        &mut self,
        categories: Vec<Category>,
        customers: Vec<Customer>,
        suppliers: Vec<Supplier>,
    ) {
        self.categories = categories;
        self.customers = customers;
        self.suppliers = suppliers;
        self.loaded = true;
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Categories a product may be assigned to.
    pub fn active_categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.categories.iter().filter(|c| c.is_active)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        by_id(&self.categories, id)
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        by_id(&self.customers, id)
    }

    pub fn upsert_customer(&mut self, customer: Customer) {
        match self.customers.iter_mut().find(|c| c.id() == customer.id()) {
            Some(existing) => *existing = customer,
            None => self.customers.push(customer),
        }
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn supplier(&self, id: SupplierId) -> Option<&Supplier> {
        by_id(&self.suppliers, id)
    }

    /// Case-insensitive lookup by name, as typed in the adjustment form.
    pub fn supplier_named(&self, name: &str) -> Option<&Supplier> {
        let name = name.trim();
        self.suppliers
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

fn by_id<T: Entity>(items: &[T], id: T::Id) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}
