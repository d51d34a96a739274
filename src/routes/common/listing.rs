use crate::domain::{FruitKind, HarvestFilter, PageRequest};
use serde::Deserialize;

/// Query string of harvest listings: `?page=2&year=2024&fruit=apple`.
#[derive(Debug, Deserialize)]
pub struct HarvestListQuery {
    /// 1-based, defaults to the first page
    page: Option<u32>,
    year: Option<i32>,
    fruit: Option<FruitKind>,
}

impl HarvestListQuery {
    pub fn filter(&self) -> HarvestFilter {
        HarvestFilter {
            year: self.year,
            fruit: self.fruit,
        }
    }

    pub fn page_request(&self, page_size: u32) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1), page_size)
    }
}
