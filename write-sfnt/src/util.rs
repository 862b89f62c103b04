//! Misc utility functions

/// The binary search header fields shared by the table directory and
/// cmap format 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRange {
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl SearchRange {
    /// Compute the search fields for `n_items` of size `item_size`.
    pub fn compute(n_items: usize, item_size: usize) -> Self {
        let entry_selector = (n_items.max(1) as f64).log2().floor() as u32;
        let search_range = item_size * 2usize.pow(entry_selector);
        let range_shift = (n_items * item_size).saturating_sub(search_range);
        SearchRange {
            search_range: search_range as u16,
            entry_selector: entry_selector as u16,
            range_shift: range_shift as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_the_spec_example() {
        // the OpenType table directory example: 39 tables of 16 bytes
        let result = SearchRange::compute(39, 16);
        assert_eq!(result.search_range, 512);
        assert_eq!(result.entry_selector, 5);
        assert_eq!(result.range_shift, 112);
    }

    #[test]
    fn exact_power_of_two() {
        let result = SearchRange::compute(8, 16);
        assert_eq!(result.search_range, 128);
        assert_eq!(result.entry_selector, 3);
        assert_eq!(result.range_shift, 0);
    }
}
