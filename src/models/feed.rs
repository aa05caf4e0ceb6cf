// src/models/feed.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Fixed number of items per page for every paged listing.
pub const PAGE_SIZE: i64 = 10;

/// Query parameters accepted by paged listings.
/// `page` is kept raw so that junk input can be clamped instead of rejected.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// Query parameters for filter-scoped listings.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub filter: Option<String>,
    pub page: Option<String>,
}

/// A 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumber(i64);

impl PageNumber {
    /// Parses a raw query value. Missing, non-numeric or non-positive input becomes page 1.
    /// There is no upper bound; pages past the end are simply empty.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.and_then(|r| r.trim().parse::<i64>().ok()) {
            Some(n) if n > 0 => PageNumber(n),
            _ => PageNumber(1),
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn offset(self) -> i64 {
        (self.0 - 1).saturating_mul(PAGE_SIZE)
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        PageNumber(1)
    }
}

/// One page of a listing plus the totals needed to render pagination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_page: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: PageNumber, total: i64) -> Self {
        Self {
            items,
            page: page.get(),
            page_size: PAGE_SIZE,
            total,
            total_page: total_pages(total),
        }
    }

    pub fn empty(page: PageNumber) -> Self {
        Self::new(Vec::new(), page, 0)
    }
}

impl<T: Serialize> Page<T> {
    /// Renders the response envelope, naming the item list `key`
    /// (`blogs`, `comments`, `users`, ...).
    pub fn into_body(self, msg: &str, key: &str) -> Result<Value, AppError> {
        let items = serde_json::to_value(&self.items)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        let mut body = Map::new();
        body.insert("msg".into(), Value::from(msg));
        body.insert(key.into(), items);
        body.insert("page".into(), Value::from(self.page));
        body.insert("pageSize".into(), Value::from(self.page_size));
        body.insert("total".into(), Value::from(self.total));
        body.insert("totalPage".into(), Value::from(self.total_page));
        Ok(Value::Object(body))
    }
}

/// `ceil(total / PAGE_SIZE)`.
pub fn total_pages(total: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total + PAGE_SIZE - 1) / PAGE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_number_clamps_bad_input() {
        assert_eq!(PageNumber::parse(None).get(), 1);
        assert_eq!(PageNumber::parse(Some("abc")).get(), 1);
        assert_eq!(PageNumber::parse(Some("0")).get(), 1);
        assert_eq!(PageNumber::parse(Some("-3")).get(), 1);
        assert_eq!(PageNumber::parse(Some("2.5")).get(), 1);
        assert_eq!(PageNumber::parse(Some("4")).get(), 4);
        assert_eq!(PageNumber::parse(Some("999")).get(), 999);
    }

    #[test]
    fn offsets_follow_page_size() {
        assert_eq!(PageNumber::parse(Some("1")).offset(), 0);
        assert_eq!(PageNumber::parse(Some("3")).offset(), 20);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(25), 3);
    }

    #[test]
    fn body_uses_requested_key() {
        let page = Page::new(vec![1, 2], PageNumber::parse(Some("2")), 12);
        let body = page.into_body("ok", "blogs").unwrap();
        assert_eq!(body["blogs"], serde_json::json!([1, 2]));
        assert_eq!(body["page"], 2);
        assert_eq!(body["pageSize"], 10);
        assert_eq!(body["total"], 12);
        assert_eq!(body["totalPage"], 2);
    }
}
