//! Pure pagination math and page-window shaping helpers.
//!
//! Pages are 0-based here; only user-facing text is 1-based.

/// Compute the number of pages for a paginated list.
pub fn total_pages(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1))
}

/// Clamp a page into `0..total_pages` (page 0 when there are no pages).
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages.saturating_sub(1))
}

/// Move `delta` pages from `page`, clamping at both ends instead of wrapping.
pub fn step_page(page: usize, delta: isize, total_pages: usize) -> usize {
    clamp_page(page.saturating_add_signed(delta), total_pages)
}

/// Return start/end indices for a page window.
pub fn page_window(total_items: usize, per_page: usize, page: usize) -> (usize, usize) {
    let safe_per_page = per_page.max(1);
    let start = page.saturating_mul(safe_per_page).min(total_items);
    let end = start.saturating_add(safe_per_page).min(total_items);
    (start, end)
}

/// Borrow the items on `page`; empty when the page is past the end.
pub fn page_slice<T>(items: &[T], per_page: usize, page: usize) -> &[T] {
    let (start, end) = page_window(items.len(), per_page, page);
    &items[start..end]
}

/// Parse a 1-based page typed by a user into a 0-based page.
///
/// Returns `None` unless the value is a number within `1..=total_pages`.
pub fn parse_one_based_page(raw: &str, total_pages: usize) -> Option<usize> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|page| (1..=total_pages).contains(page))
        .map(|page| page - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn slices_match_page_count_invariant() {
        let per_page = 5;
        for item_count in 0..=23 {
            let items: Vec<usize> = (0..item_count).collect();
            let total = total_pages(item_count, per_page);

            for page in 0..total {
                let slice = page_slice(&items, per_page, page);
                let expected = if page + 1 < total || item_count % per_page == 0 {
                    per_page
                } else {
                    item_count % per_page
                };
                assert_eq!(slice.len(), expected, "{item_count} items, page {page}");
                assert_eq!(slice[0], page * per_page);
            }
        }
    }

    #[test]
    fn slice_past_end_is_empty() {
        let items = [1, 2, 3];
        assert!(page_slice(&items, 2, 7).is_empty());
        assert!(page_slice(&items, 2, usize::MAX).is_empty());
    }

    #[test]
    fn stepping_clamps_at_both_ends() {
        let total = 4;
        let mut page = 0;
        for _ in 0..total {
            page = step_page(page, 1, total);
        }
        assert_eq!(page, total - 1);
        assert_eq!(step_page(page, 1, total), total - 1);

        for _ in 0..total {
            page = step_page(page, -1, total);
        }
        assert_eq!(page, 0);
        assert_eq!(step_page(0, -1, total), 0);
        assert_eq!(step_page(0, 1, 0), 0);
    }

    #[test]
    fn parses_one_based_input() {
        assert_eq!(parse_one_based_page("1", 3), Some(0));
        assert_eq!(parse_one_based_page(" 3 ", 3), Some(2));
        assert_eq!(parse_one_based_page("0", 3), None);
        assert_eq!(parse_one_based_page("9", 3), None);
        assert_eq!(parse_one_based_page("two", 3), None);
        assert_eq!(parse_one_based_page("-1", 3), None);
        assert_eq!(parse_one_based_page("1", 0), None);
    }
}
