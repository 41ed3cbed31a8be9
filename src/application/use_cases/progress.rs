use tracing::info;

/// `enumerate` that stops at `max_items` and logs progress every `log_interval` items
pub struct ControlledEnumerate<'a, T> {
    items: &'a [T],
    index: usize,
    log_interval: usize,
    limit: usize,
}

impl<'a, T> Iterator for ControlledEnumerate<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.limit {
            return None;
        }
        let index = self.index;
        let item = self.items.get(index)?;
        if index % self.log_interval == 0 {
            info!("{}/{}", index + 1, self.items.len());
        }
        self.index += 1;
        Some((index, item))
    }
}

pub fn controlled_enumerate<T>(
    items: &[T],
    log_interval: usize,
    max_items: Option<usize>,
) -> ControlledEnumerate<'_, T> {
    ControlledEnumerate {
        items,
        index: 0,
        log_interval: log_interval.max(1),
        limit: max_items.map_or(items.len(), |max| max.min(items.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerates_correctly() {
        let data = ["a", "b", "c"];
        let actual: Vec<_> = controlled_enumerate(&data, 1, None).collect();
        assert_eq!(actual, vec![(0, &"a"), (1, &"b"), (2, &"c")]);
    }

    #[test]
    fn test_empty_data() {
        let data: [&str; 0] = [];
        assert_eq!(controlled_enumerate(&data, 1, None).count(), 0);
    }

    #[test]
    fn test_limited_enumeration() {
        let data = ["a", "b", "c"];
        let actual: Vec<_> = controlled_enumerate(&data, 2, Some(2)).collect();
        assert_eq!(actual, vec![(0, &"a"), (1, &"b")]);
    }

    #[test]
    fn test_max_items_zero() {
        let data = ["a", "b", "c"];
        assert_eq!(controlled_enumerate(&data, 1, Some(0)).count(), 0);
    }

    #[test]
    fn test_max_items_above_len() {
        let data = ["a", "b"];
        assert_eq!(controlled_enumerate(&data, 0, Some(10)).count(), 2);
    }
}
