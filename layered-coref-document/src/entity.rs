//! Entities (clusters of coreferent mentions) and resolution output.
//!
//! A [`Clustering`] is what every resolver returns: one [`ClusteredMention`]
//! per mention, in document order, with entity ids numbered densely in order
//! of each entity's first mention.
//!
//! ```text
//! Alice  met  Bob .  She  waved  at  him .
//! ╰───╯       ╰─╯    ╰─╯             ╰─╯
//! [A]         [B]    [A]             [B]
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{CorefError, CorefResult, Document, MentionId};

/// Identifier of an entity within one resolved document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub usize);

/// A set of mentions believed to corefer, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub mentions: Vec<MentionId>,
}

impl Entity {
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.mentions.len() == 1
    }
}

/// Assignment of one mention to its resolved entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusteredMention {
    pub mention: MentionId,
    pub entity: EntityId,
}

/// The resolution of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clustering {
    assignments: Vec<ClusteredMention>,
    entities: Vec<Entity>,
}

impl Clustering {
    /// Build from one arbitrary cluster label per mention.
    ///
    /// Labels are renumbered so entity ids follow first appearance.
    pub fn from_labels<L>(labels: &[L]) -> Self
    where
        L: Eq + std::hash::Hash,
    {
        let mut renumbered: HashMap<&L, EntityId> = HashMap::new();
        let mut entities: Vec<Entity> = Vec::new();
        let mut assignments = Vec::with_capacity(labels.len());

        for (index, label) in labels.iter().enumerate() {
            let mention = MentionId(index);
            let entity = *renumbered.entry(label).or_insert_with(|| {
                let id = EntityId(entities.len());
                entities.push(Entity {
                    id,
                    mentions: Vec::new(),
                });
                id
            });
            entities[entity.0].mentions.push(mention);
            assignments.push(ClusteredMention { mention, entity });
        }

        Self {
            assignments,
            entities,
        }
    }

    /// Every mention in its own entity.
    pub fn singletons(mention_count: usize) -> Self {
        let labels: Vec<usize> = (0..mention_count).collect();
        Self::from_labels(&labels)
    }

    /// All mentions in one entity.
    pub fn one_cluster(mention_count: usize) -> Self {
        Self::from_labels(&vec![0usize; mention_count])
    }

    /// One assignment per mention, in document order.
    pub fn clustered_mentions(&self) -> &[ClusteredMention] {
        &self.assignments
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_of(&self, mention: MentionId) -> Option<EntityId> {
        self.assignments.get(mention.0).map(|cm| cm.entity)
    }

    pub fn same_entity(&self, a: MentionId, b: MentionId) -> bool {
        match (self.entity_of(a), self.entity_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Mention groups, each in document order, ordered by first mention.
    pub fn groups(&self) -> Vec<Vec<MentionId>> {
        self.entities.iter().map(|e| e.mentions.clone()).collect()
    }

    /// Returns true if the entities partition exactly the mentions `0..mention_count`
    /// and the assignments list them in order.
    pub fn is_partition_of(&self, mention_count: usize) -> bool {
        if self.assignments.len() != mention_count {
            return false;
        }
        let in_order = self
            .assignments
            .iter()
            .enumerate()
            .all(|(i, cm)| cm.mention == MentionId(i));

        let mut seen = vec![false; mention_count];
        for entity in &self.entities {
            for &m in &entity.mentions {
                match seen.get_mut(m.0) {
                    Some(slot) if !*slot => *slot = true,
                    _ => return false,
                }
            }
        }
        in_order && seen.into_iter().all(|s| s)
    }
}

// ============================================================================
// GOLD ENTITIES
// ============================================================================

/// A document's gold partition, used for training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldEntities {
    document: String,
    entities: Vec<Vec<MentionId>>,
    lookup: HashMap<MentionId, EntityId>,
}

impl GoldEntities {
    /// Gold clusters for `doc`; entity ids are positions in `entities`.
    pub fn new(doc: &Document, entities: Vec<Vec<MentionId>>) -> Self {
        let mut lookup = HashMap::new();
        for (index, entity) in entities.iter().enumerate() {
            for &mention in entity {
                lookup.entry(mention).or_insert(EntityId(index));
            }
        }
        Self {
            document: doc.id().to_string(),
            entities,
            lookup,
        }
    }

    /// Gold clusters taken from a resolved clustering.
    pub fn from_clustering(doc: &Document, clustering: &Clustering) -> Self {
        Self::new(doc, clustering.groups())
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn entities(&self) -> &[Vec<MentionId>] {
        &self.entities
    }

    /// Gold entity of a mention, or `CorpusInconsistency` if it has none.
    pub fn entity_of(&self, mention: MentionId) -> CorefResult<EntityId> {
        self.lookup
            .get(&mention)
            .copied()
            .ok_or_else(|| self.inconsistency(mention))
    }

    /// Checks that the gold entities partition exactly the mentions of `doc`.
    ///
    /// Fails on the first listed id `doc` does not have, the first mention
    /// listed twice, or else the first mention left out.
    pub fn check_complete(&self, doc: &Document) -> CorefResult<()> {
        let mut seen = vec![false; doc.mention_count()];
        for &mention in self.entities.iter().flatten() {
            match seen.get_mut(mention.0) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(self.inconsistency(mention)),
            }
        }
        match seen.iter().position(|&listed| !listed) {
            Some(missing) => Err(self.inconsistency(MentionId(missing))),
            None => Ok(()),
        }
    }

    fn inconsistency(&self, mention: MentionId) -> CorefError {
        CorefError::CorpusInconsistency {
            document: self.document.clone(),
            mention: mention.0,
        }
    }
}
