//! Disjoint-set cluster state for one document.
//!
//! Clusters only ever grow: a merge re-parents one root under another and
//! moves its member list, so the number of clusters strictly decreases with
//! each successful merge.

use layered_coref_document::{Clustering, MentionId};

/// Root mention index identifying a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub usize);

#[derive(Debug, Clone)]
pub struct ClusterSet {
    parent: Vec<usize>,
    /// Members of each root, in document order. Empty for non-roots.
    members: Vec<Vec<MentionId>>,
    count: usize,
}

impl ClusterSet {
    /// Every mention in its own cluster.
    pub fn singletons(mention_count: usize) -> Self {
        Self {
            parent: (0..mention_count).collect(),
            members: (0..mention_count).map(|i| vec![MentionId(i)]).collect(),
            count: mention_count,
        }
    }

    pub fn find(&self, mention: MentionId) -> ClusterId {
        let mut current = mention.index();
        while self.parent[current] != current {
            current = self.parent[current];
        }
        ClusterId(current)
    }

    pub fn is_root(&self, cluster: ClusterId) -> bool {
        self.parent[cluster.0] == cluster.0
    }

    /// Current clusters, ordered by their earliest mention.
    pub fn roots(&self) -> Vec<ClusterId> {
        let mut roots: Vec<ClusterId> = (0..self.parent.len())
            .map(ClusterId)
            .filter(|&c| self.is_root(c))
            .collect();
        roots.sort_by_key(|&c| self.members[c.0].first().copied());
        roots
    }

    pub fn members(&self, cluster: ClusterId) -> &[MentionId] {
        &self.members[cluster.0]
    }

    pub fn same_cluster(&self, a: MentionId, b: MentionId) -> bool {
        self.find(a) == self.find(b)
    }

    /// Move every member of `from` into `into`. Returns false if they were
    /// already one cluster.
    pub fn merge(&mut self, into: ClusterId, from: ClusterId) -> bool {
        let (into, from) = (self.root_of(into), self.root_of(from));
        if into == from {
            return false;
        }
        self.parent[from.0] = into.0;
        let moved = std::mem::take(&mut self.members[from.0]);
        let target = &mut self.members[into.0];
        target.extend(moved);
        target.sort();
        self.count -= 1;
        true
    }

    fn root_of(&self, cluster: ClusterId) -> ClusterId {
        self.find(MentionId(cluster.0))
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn to_clustering(&self) -> Clustering {
        let labels: Vec<ClusterId> = (0..self.parent.len())
            .map(|i| self.find(MentionId(i)))
            .collect();
        Clustering::from_labels(&labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_roots() {
        let mut set = ClusterSet::singletons(4);
        assert_eq!(set.len(), 4);

        assert!(set.merge(ClusterId(3), ClusterId(0)));
        assert!(!set.merge(ClusterId(0), ClusterId(3)));
        assert_eq!(set.len(), 3);
        assert!(set.same_cluster(MentionId(0), MentionId(3)));

        // Cluster {0, 3} is rooted at 3 but still sorts first.
        assert_eq!(set.roots(), vec![ClusterId(3), ClusterId(1), ClusterId(2)]);
        assert_eq!(set.members(ClusterId(3)), &[MentionId(0), MentionId(3)]);
        assert!(set.members(ClusterId(0)).is_empty());

        // Merging through a non-root id resolves to its root.
        assert!(set.merge(ClusterId(1), ClusterId(0)));
        assert_eq!(set.members(ClusterId(1)), &[MentionId(0), MentionId(1), MentionId(3)]);
    }

    #[test]
    fn test_to_clustering() {
        let mut set = ClusterSet::singletons(3);
        set.merge(ClusterId(2), ClusterId(0));
        let clustering = set.to_clustering();
        assert_eq!(
            clustering.groups(),
            vec![vec![MentionId(0), MentionId(2)], vec![MentionId(1)]]
        );
    }
}
