use stockia_core::CategoryId;

/// Parameters of `GET /api/products`.
///
/// Optional filters are only sent when set; `sort` entries repeat
/// (`sort=name,asc&sort=price,desc`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<String>,
    pub q: Option<String>,
    pub category_id: Option<CategoryId>,
    pub low_stock: Option<bool>,
    pub include_inactive: Option<bool>,
    pub deleted: Option<bool>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort: Vec::new(),
            q: None,
            category_id: None,
            low_stock: None,
            include_inactive: None,
            deleted: None,
        }
    }
}

impl ProductQuery {
    pub fn page(mut self, page: u32, size: u32) -> Self {
        self.page = page;
        self.size = size;
        self
    }

    pub fn search(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        self.q = Some(q).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn sort_by(mut self, sort: impl Into<String>) -> Self {
        self.sort.push(sort.into());
        self
    }

    pub fn in_category(mut self, id: CategoryId) -> Self {
        self.category_id = Some(id);
        self
    }

    pub fn low_stock(mut self, only_low: bool) -> Self {
        self.low_stock = Some(only_low);
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        pairs.extend(self.sort.iter().map(|s| ("sort", s.clone())));
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        if let Some(id) = self.category_id {
            pairs.push(("categoryId", id.to_string()));
        }
        let flags = [
            ("lowStock", self.low_stock),
            ("includeInactive", self.include_inactive),
            ("deleted", self.deleted),
        ];
        for (name, flag) in flags {
            if let Some(flag) = flag {
                pairs.push((name, flag.to_string()));
            }
        }
        pairs
    }
}
