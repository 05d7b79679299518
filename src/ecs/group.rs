//! Group tags for the manager's secondary indices

use super::MAX_GROUPS;

/// Gameplay role used to enumerate entities quickly (paddle, brick, ball...)
///
/// An entity may belong to any number of groups. Building a group past
/// [`MAX_GROUPS`] in a `const` fails the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Group(u8);

impl Group {
    pub const fn new(id: usize) -> Self {
        assert!(id < MAX_GROUPS, "group exceeds MAX_GROUPS");
        Self(id as u8)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) const fn bit(self) -> u32 {
        1 << self.0
    }

    /// Every possible group, in index order
    pub(crate) fn all() -> impl Iterator<Item = Group> {
        (0..MAX_GROUPS).map(Group::new)
    }
}
