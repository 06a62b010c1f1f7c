use std::collections::HashSet;

/// Record ids observed during the most recently completed cycle.
///
/// The set is never merged with a later cycle: it is replaced wholesale by
/// [`SnapshotBuilder::finish`], so records that stop showing up age out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeenSet {
    ids: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_seen(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Accumulates the ids of the cycle in progress.
///
/// Nothing inserted here is visible through [`SeenSet::is_seen`] until the
/// builder is finished at the cycle boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnapshotBuilder {
    ids: HashSet<String>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id was not yet part of this cycle.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn finish(self) -> SeenSet {
        SeenSet { ids: self.ids }
    }
}
