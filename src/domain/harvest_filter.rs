use super::FruitKind;
use serde::{Deserialize, Serialize};

/// Optional narrowing of a harvest listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestFilter {
    pub year: Option<i32>,
    pub fruit: Option<FruitKind>,
}

impl HarvestFilter {
    pub fn matches(&self, date_year: i32, fruit: FruitKind) -> bool {
        self.year.is_none_or(|year| year == date_year) && self.fruit.is_none_or(|f| f == fruit)
    }
}

/// 1-based page request, only built through [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(request.per_page));
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total_items,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
