//! 목록 페이지 나누기 (한 페이지 12개)

use serde::Serialize;

pub const PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 요청한 페이지 번호 (1부터 시작)
    pub page: usize,
    pub total_pages: usize,
    /// 필터링된 전체 항목 수
    pub total: usize,
}

/// `items`에서 `page`번째 페이지를 잘라냅니다.
///
/// - `total_pages = ceil(n / page_size)`, 항목이 없으면 0
/// - 마지막 페이지를 넘는 번호는 빈 페이지를 돌려줍니다 (에러 아님)
/// - `page == 0`은 1페이지로 취급합니다
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();

    Page {
        items,
        page,
        total_pages,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_no_pages() {
        let page = paginate(Vec::<u32>::new(), 1, PAGE_SIZE);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(paginate((0..12).collect::<Vec<_>>(), 1, PAGE_SIZE).total_pages, 1);
        assert_eq!(paginate((0..13).collect::<Vec<_>>(), 1, PAGE_SIZE).total_pages, 2);
        assert_eq!(paginate((0..25).collect::<Vec<_>>(), 3, PAGE_SIZE).items, vec![24]);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let page = paginate((0..5).collect::<Vec<_>>(), 4, PAGE_SIZE);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total, 5);
    }

    #[test]
    fn page_zero_is_first_page() {
        let page = paginate((0..3).collect::<Vec<_>>(), 0, PAGE_SIZE);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![0, 1, 2]);
    }

    #[test]
    fn pages_concatenate_to_original() {
        for n in [0usize, 1, 11, 12, 13, 24, 37] {
            let list: Vec<usize> = (0..n).collect();
            let total_pages = paginate(list.clone(), 1, PAGE_SIZE).total_pages;

            let joined: Vec<usize> = (1..=total_pages)
                .flat_map(|p| paginate(list.clone(), p, PAGE_SIZE).items)
                .collect();
            assert_eq!(joined, list, "n = {n}");
        }
    }
}
