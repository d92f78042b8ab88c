use std::collections::BTreeSet;

use wyterm_shared::Region;

/// Regions touched by one or more mutations, in region order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    regions: BTreeSet<Region>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(region: Region) -> Self {
        let mut set = Self::new();
        set.insert(region);
        set
    }

    pub fn insert(&mut self, region: Region) {
        self.regions.insert(region);
    }

    pub fn merge(&mut self, other: ChangeSet) {
        self.regions.extend(other.regions);
    }

    pub fn contains(&self, region: Region) -> bool {
        self.regions.contains(&region)
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn regions(&self) -> impl Iterator<Item = Region> + '_ {
        self.regions.iter().copied()
    }
}
