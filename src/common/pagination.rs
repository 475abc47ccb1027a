use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub struct PageInfo {
    pub current_page: i64,
    pub last_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub has_more_pages: bool,
}

impl PageInfo {
    pub fn new(request: &PageRequest, total: i64) -> Self {
        let current_page = request.page();
        let per_page = request.per_page();
        let last_page = (total + per_page - 1).div_euclid(per_page).max(1);
        let offset = request.offset();
        let on_page = (total - offset).clamp(0, per_page);
        let (from, to) = match on_page {
            0 => (None, None),
            n => (Some(offset + 1), Some(offset + n)),
        };
        PageInfo {
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
            has_more_pages: current_page < last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_query_is_empty() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn per_page_is_clamped() {
        let request = PageRequest::new(1, 100_000);
        assert_eq!(request.per_page(), MAX_PAGE_SIZE);
        let request = PageRequest::new(1, 0);
        assert_eq!(request.per_page(), 1);
    }

    #[test]
    fn page_floor_is_one() {
        let request = PageRequest::new(-3, 10);
        assert_eq!(request.page(), 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn full_middle_page() {
        let info = PageInfo::new(&PageRequest::new(2, 10), 35);
        assert_eq!(info.current_page, 2);
        assert_eq!(info.last_page, 4);
        assert_eq!(info.from, Some(11));
        assert_eq!(info.to, Some(20));
        assert!(info.has_more_pages);
    }

    #[test]
    fn short_final_page() {
        let info = PageInfo::new(&PageRequest::new(4, 10), 35);
        assert_eq!(info.from, Some(31));
        assert_eq!(info.to, Some(35));
        assert!(!info.has_more_pages);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let info = PageInfo::new(&PageRequest::new(9, 10), 35);
        assert_eq!(info.from, None);
        assert_eq!(info.to, None);
        assert!(!info.has_more_pages);
    }

    #[test]
    fn empty_result_set_still_has_one_page() {
        let info = PageInfo::new(&PageRequest::new(1, 20), 0);
        assert_eq!(info.last_page, 1);
        assert_eq!(info.total, 0);
        assert_eq!(info.from, None);
        assert!(!info.has_more_pages);
    }

    #[test]
    fn consecutive_pages_cover_the_total_without_gaps() {
        let total = 47;
        let per_page = 10;
        let mut covered = 0;
        for page in 1..=5 {
            let info = PageInfo::new(&PageRequest::new(page, per_page), total);
            if let (Some(from), Some(to)) = (info.from, info.to) {
                assert_eq!(from, covered + 1);
                covered = to;
            }
        }
        assert_eq!(covered, total);
    }
}
