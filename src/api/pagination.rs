use serde::{Deserialize, Serialize};

pub(crate) const fn default_page() -> i64 {
    1
}

pub(crate) const fn default_limit() -> i64 {
    10
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct PageQuery {
    #[serde(default = "default_page")]
    pub(crate) page: i64,
    #[serde(default = "default_limit")]
    pub(crate) limit: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: default_page(), limit: default_limit() }
    }
}

impl PageQuery {
    pub(crate) fn normalize(self) -> (i64, i64, i64) {
        let page = self.page.max(1);
        let limit = self.limit.clamp(1, 1000);
        (page, limit, (page - 1) * limit)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PageInfo {
    pub(crate) page: i64,
    pub(crate) limit: i64,
    pub(crate) total: i64,
    pub(crate) pages: i64,
}

impl PageInfo {
    pub(crate) fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self { page, limit, total, pages }
    }
}
