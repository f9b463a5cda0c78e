use std::collections::BTreeMap;

use crate::resources::ResType;

/// Retain-counted set of the type codes present in the open resource files.
///
/// A code is present exactly while at least one open file contains it, and its count is the
/// number of open files that do. Iteration is in code order.
#[derive(Debug, Default, Clone)]
pub struct TypeDirectory {
    counts: BTreeMap<ResType, usize>,
}

impl TypeDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one retain for `res_type`.
    pub fn retain(&mut self, res_type: ResType) {
        *self.counts.entry(res_type).or_insert(0) += 1;
    }

    /// Drops one retain for `res_type`, removing it when none are left.
    pub fn release(&mut self, res_type: ResType) {
        if let Some(count) = self.counts.get_mut(&res_type) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&res_type);
            }
        }
    }

    /// Number of retains held for `res_type`.
    #[must_use]
    pub fn retain_count(&self, res_type: ResType) -> usize {
        self.counts.get(&res_type).copied().unwrap_or(0)
    }

    /// Number of distinct type codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no type is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The type code at `index` in code order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ResType> {
        self.counts.keys().nth(index).copied()
    }

    /// All type codes in code order.
    pub fn iter(&self) -> impl Iterator<Item = ResType> + '_ {
        self.counts.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PICT: ResType = ResType::from_bytes(*b"PICT");
    const TEXT: ResType = ResType::from_bytes(*b"TEXT");

    #[test]
    fn retain_release() {
        let mut directory = TypeDirectory::new();
        directory.retain(PICT);
        directory.retain(TEXT);
        directory.retain(PICT);

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.retain_count(PICT), 2);

        directory.release(PICT);
        assert_eq!(directory.retain_count(PICT), 1);
        assert_eq!(directory.len(), 2);

        directory.release(PICT);
        assert_eq!(directory.retain_count(PICT), 0);
        assert_eq!(directory.len(), 1);

        // Releasing an absent type is a no-op
        directory.release(PICT);
        assert_eq!(directory.len(), 1);

        directory.release(TEXT);
        assert!(directory.is_empty());
    }

    #[test]
    fn ordered() {
        let mut directory = TypeDirectory::new();
        directory.retain(TEXT);
        directory.retain(PICT);

        assert_eq!(directory.get(0), Some(PICT));
        assert_eq!(directory.get(1), Some(TEXT));
        assert_eq!(directory.get(2), None);
        assert_eq!(directory.iter().collect::<Vec<_>>(), vec![PICT, TEXT]);
    }
}
