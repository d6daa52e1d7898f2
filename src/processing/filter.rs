//! Order-preserving filtering.

/// Returns a new `Vec` containing clones of the items for which `predicate` returns `true`.
///
/// Relative order is preserved and `items` is left untouched.
pub fn filter<T, F>(items: &[T], mut predicate: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    items.iter().filter(|item| predicate(item)).cloned().collect()
}
