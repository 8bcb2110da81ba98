use fl_utils::hash::HashSet;

/// Identities of the shared pointers on the current resolution path.
///
/// A pointer is entered before its target is resolved and left afterwards,
/// so siblings that share a target are not cycles; only a pointer reached
/// again below itself is.
#[derive(Debug, Default)]
pub(crate) struct VisitedSet(HashSet<usize>);

impl VisitedSet {
    /// Returns `false` if `identity` is already on the path.
    #[inline]
    pub fn enter(&mut self, identity: usize) -> bool {
        self.0.insert(identity)
    }

    #[inline]
    pub fn leave(&mut self, identity: usize) {
        self.0.remove(&identity);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::VisitedSet;

    #[test]
    fn enter_leave() {
        let mut set = VisitedSet::default();
        assert!(set.enter(0x1000));
        assert!(!set.enter(0x1000));
        set.leave(0x1000);
        assert!(set.enter(0x1000));
        set.clear();
        assert!(set.is_empty());
    }
}
