//! Response envelopes of the Stockia REST API.

use std::collections::BTreeMap;

use serde::Deserialize;

/// `{success, message, data}` wrapper around every response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResult<T> {
    #[serde(default = "succeeded")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

fn succeeded() -> bool {
    true
}

/// `data` of a 400 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorData {
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Spring `Page` serialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

/// List endpoints answer with either a page or a bare array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Page(Page<T>),
    Items(Vec<T>),
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
}

/// One page of records plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub page: PageInfo,
}

impl<T> Listing<T> {
    /// A single page holding everything.
    pub fn complete(items: Vec<T>) -> Self {
        let len = items.len() as u64;
        Self {
            page: PageInfo {
                total_elements: len,
                total_pages: 1,
                number: 0,
                size: u32::try_from(len).unwrap_or(u32::MAX),
            },
            items,
        }
    }
}

impl<T> ListPayload<T> {
    /// Normalize; missing page metadata falls back to the requested
    /// `page`/`size` and the number of items received.
    pub fn into_listing(self, page: u32, size: u32) -> Listing<T> {
        match self {
            ListPayload::Items(items) => {
                let total_elements = items.len() as u64;
                Listing {
                    items,
                    page: PageInfo {
                        total_elements,
                        total_pages: 1,
                        number: page,
                        size,
                    },
                }
            }
            ListPayload::Page(p) => {
                let total_elements = p.total_elements.unwrap_or(p.content.len() as u64);
                Listing {
                    page: PageInfo {
                        total_elements,
                        total_pages: p.total_pages.unwrap_or(1),
                        number: p.number.unwrap_or(page),
                        size: p.size.unwrap_or(size),
                    },
                    items: p.content,
                }
            }
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Items(items) => items,
            ListPayload::Page(p) => p.content,
        }
    }
}
