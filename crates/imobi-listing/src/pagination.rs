//! Page numbers shown under search results

/// Up to `width` consecutive page numbers around `current`, within `1..=total`.
///
/// # Examples
///
/// ```
/// use imobi_listing::pagination::page_window;
///
/// assert_eq!(page_window(1, 10, 5), vec![1, 2, 3, 4, 5]);
/// assert_eq!(page_window(6, 10, 5), vec![4, 5, 6, 7, 8]);
/// assert_eq!(page_window(10, 10, 5), vec![6, 7, 8, 9, 10]);
/// ```
pub fn page_window(current: u32, total: u32, width: u32) -> Vec<u32> {
    if total == 0 || width == 0 {
        return Vec::new();
    }

    let current = current.clamp(1, total);
    let width = width.min(total);
    let start = current
        .saturating_sub(width / 2)
        .max(1)
        .min(total - width + 1);

    (start..start + width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_small_totals() {
        assert_eq!(page_window(1, 0, 5), Vec::<u32>::new());
        assert_eq!(page_window(1, 1, 5), vec![1]);
        assert_eq!(page_window(3, 3, 5), vec![1, 2, 3]);
        assert_eq!(page_window(9, 3, 5), vec![1, 2, 3]);
    }

    proptest! {
        #[test]
        fn window_contains_current(current in 1u32..200, total in 1u32..200, width in 1u32..12) {
            let pages = page_window(current, total, width);
            prop_assert_eq!(pages.len() as u32, width.min(total));
            prop_assert!(pages.contains(&current.min(total)));
            prop_assert!(pages.iter().all(|p| (1..=total).contains(p)));
        }
    }
}
