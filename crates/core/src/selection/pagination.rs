use crate::error::{Entity, Error, Result};

/// Games shown per catalog page
pub const RESULTS_PER_PAGE: usize = 6;

pub fn num_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Returns page `page` (1-based) of `items`.
///
/// A page outside `1..=num_pages` is an error rather than an empty page, so
/// an empty `items` always fails.
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: usize) -> Result<Vec<T>> {
    if page_size == 0 {
        return Err(Error::Internal("page size must be positive".into()));
    }

    let pages = num_pages(items.len(), page_size);
    let page = page as usize;
    if page < 1 || page > pages {
        return Err(Error::not_found(
            Entity::Game,
            format!("page {} is out of range ({} pages)", page, pages),
        ));
    }

    let start = (page - 1) * page_size;
    Ok(items.into_iter().skip(start).take(page_size).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_sizes() {
        let items: Vec<u32> = (0..20).collect();
        assert_eq!(num_pages(items.len(), RESULTS_PER_PAGE), 4);

        for page in 1..=3 {
            let slice = paginate(items.clone(), page, RESULTS_PER_PAGE).unwrap();
            assert_eq!(slice.len(), RESULTS_PER_PAGE);
        }
        assert_eq!(
            paginate(items.clone(), 4, RESULTS_PER_PAGE).unwrap(),
            vec![18, 19]
        );
    }

    #[test]
    fn test_slices_do_not_overlap() {
        let items: Vec<u32> = (0..13).collect();
        let mut seen = Vec::new();
        for page in 1..=num_pages(items.len(), RESULTS_PER_PAGE) as u32 {
            seen.extend(paginate(items.clone(), page, RESULTS_PER_PAGE).unwrap());
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn test_out_of_range_pages_are_not_found() {
        let items: Vec<u32> = (0..12).collect();
        assert!(paginate(items.clone(), 0, RESULTS_PER_PAGE)
            .unwrap_err()
            .is_not_found_for(Entity::Game));
        assert!(paginate(items, 3, RESULTS_PER_PAGE)
            .unwrap_err()
            .is_not_found_for(Entity::Game));
        assert!(paginate(Vec::<u32>::new(), 1, RESULTS_PER_PAGE).is_err());
    }
}
