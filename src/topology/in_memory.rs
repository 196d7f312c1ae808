//! Deterministic in-memory entity store.
//!
//! Entities live in a `BTreeMap` keyed by [`EntityKey`]; each entity keeps a
//! sorted outgoing list (its cone) and a mirrored sorted incoming list (its
//! support). Every iteration is therefore in ascending key order, and a run
//! with a fixed seed touches entities in the same order every time.
//!
//! Meshes are loaded through [`InMemoryEntityStore::insert_node`] and
//! [`InMemoryEntityStore::insert_element`], which do not need a modification
//! window. Everything after loading goes through the [`EntityStore`] trait.

use std::collections::BTreeMap;

use crate::data::section::Section;
use crate::mesh_error::MeshFractureError;
use crate::topology::cell_type::CellType;
use crate::topology::point::EntityKey;
use crate::topology::rank::{EntityRank, LocalId};
use crate::topology::sets::MeshSets;
use crate::topology::store::{EntityStore, Relation};

/// Name of the nodal coordinate field every store carries.
pub const COORDINATES: &str = "coordinates";

/// Per-entity metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityRecord {
    pub rank: EntityRank,
    pub cell_type: Option<CellType>,
    pub owned: bool,
    /// Element block the entity was read from, if any.
    pub block: Option<String>,
}

impl EntityRecord {
    fn new(rank: EntityRank, cell_type: Option<CellType>) -> Self {
        EntityRecord {
            rank,
            cell_type,
            owned: true,
            block: None,
        }
    }
}

/// `BTreeMap`-backed [`EntityStore`] with named per-entity fields.
#[derive(Clone, Debug)]
pub struct InMemoryEntityStore {
    dimension: usize,
    records: BTreeMap<EntityKey, EntityRecord>,
    adjacency_out: BTreeMap<EntityKey, Vec<(EntityKey, LocalId)>>,
    adjacency_in: BTreeMap<EntityKey, Vec<(EntityKey, LocalId)>>,
    fields: BTreeMap<String, Section<f64>>,
    sets: MeshSets,
    next_key: u64,
    modifying: bool,
}

impl InMemoryEntityStore {
    /// Empty store for a mesh of dimension 2 or 3.
    pub fn new(dimension: usize) -> Result<Self, MeshFractureError> {
        if !(2..=3).contains(&dimension) {
            return Err(MeshFractureError::UnsupportedDimension(dimension));
        }
        let mut fields = BTreeMap::new();
        fields.insert(COORDINATES.to_string(), Section::new(dimension));
        Ok(InMemoryEntityStore {
            dimension,
            records: BTreeMap::new(),
            adjacency_out: BTreeMap::new(),
            adjacency_in: BTreeMap::new(),
            fields,
            sets: MeshSets::new(),
            next_key: 1,
            modifying: false,
        })
    }

    /// Load a node with its coordinates.
    pub fn insert_node(&mut self, key: EntityKey, coords: &[f64]) -> Result<(), MeshFractureError> {
        if coords.len() != self.dimension {
            return Err(MeshFractureError::SliceLengthMismatch {
                key,
                expected: self.dimension,
                found: coords.len(),
            });
        }
        self.insert_record(key, EntityRecord::new(EntityRank::NODE, Some(CellType::Vertex)))?;
        self.section_mut(COORDINATES)?.try_set(key, coords)
    }

    /// Load an element and declare its element→node relations, local ids `0..n`.
    pub fn insert_element(
        &mut self,
        key: EntityKey,
        cell_type: CellType,
        nodes: &[EntityKey],
        block: Option<&str>,
    ) -> Result<(), MeshFractureError> {
        if cell_type.dimension() != self.dimension {
            return Err(MeshFractureError::UnsupportedCellType(format!(
                "{} element {key} in a {}D mesh",
                cell_type.token(),
                self.dimension
            )));
        }
        if nodes.len() != cell_type.node_count() {
            return Err(MeshFractureError::CellVertexCount {
                element: key,
                expected: cell_type.node_count(),
                found: nodes.len(),
            });
        }
        for &node in nodes {
            if self.rank(node)? != EntityRank::NODE {
                return Err(MeshFractureError::MeshIoParse(format!(
                    "element {key} references {node}, which is not a node"
                )));
            }
        }
        let mut record = EntityRecord::new(EntityRank::element(self.dimension), Some(cell_type));
        record.block = block.map(str::to_string);
        self.insert_record(key, record)?;
        for (local, &node) in nodes.iter().enumerate() {
            self.link(key, node, local as LocalId)?;
        }
        Ok(())
    }

    fn insert_record(&mut self, key: EntityKey, record: EntityRecord) -> Result<(), MeshFractureError> {
        if self.records.contains_key(&key) {
            return Err(MeshFractureError::DuplicateEntity { key });
        }
        self.records.insert(key, record);
        self.next_key = self.next_key.max(key.get().saturating_add(1));
        Ok(())
    }

    pub fn record(&self, key: EntityKey) -> Option<&EntityRecord> {
        self.records.get(&key)
    }

    /// Element block name of `key`, if it was loaded from one.
    pub fn block(&self, key: EntityKey) -> Option<&str> {
        self.records.get(&key).and_then(|r| r.block.as_deref())
    }

    /// Mark `key` as owned or shared-but-not-owned.
    pub fn set_owned(&mut self, key: EntityKey, owned: bool) -> Result<(), MeshFractureError> {
        self.records
            .get_mut(&key)
            .map(|r| r.owned = owned)
            .ok_or(MeshFractureError::UnknownEntity { key })
    }

    pub fn coordinates(&self, key: EntityKey) -> Option<&[f64]> {
        self.fields.get(COORDINATES)?.try_restrict(key).ok()
    }

    /// Get or create the field `name` with `components` values per entity.
    pub fn add_field(&mut self, name: &str, components: usize) -> &mut Section<f64> {
        self.fields
            .entry(name.to_string())
            .or_insert_with(|| Section::new(components))
    }

    pub fn field(&self, name: &str) -> Option<&Section<f64>> {
        self.fields.get(name)
    }

    /// Iterate `(name, section)` in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Section<f64>)> {
        self.fields.iter().map(|(name, s)| (name.as_str(), s))
    }

    /// Named node and side sets.
    pub fn sets(&self) -> &MeshSets {
        &self.sets
    }

    /// Add `node` to the node set `name`.
    pub fn add_to_node_set(&mut self, name: &str, node: EntityKey) -> Result<(), MeshFractureError> {
        if self.rank(node)? != EntityRank::NODE {
            return Err(MeshFractureError::SetMember {
                set: name.to_string(),
                key: node,
                reason: "not a node".into(),
            });
        }
        self.sets.insert_node(name, node);
        Ok(())
    }

    /// Add local side `side` of `element` to the side set `name`.
    pub fn add_to_side_set(
        &mut self,
        name: &str,
        element: EntityKey,
        side: LocalId,
    ) -> Result<(), MeshFractureError> {
        let set_member = |reason: String| MeshFractureError::SetMember {
            set: name.to_string(),
            key: element,
            reason,
        };
        if self.rank(element)? != EntityRank::element(self.dimension) {
            return Err(set_member("not an element".into()));
        }
        let sides = self.cell_type(element).map_or(0, CellType::side_count);
        if side as usize >= sides {
            return Err(set_member(format!("side {side} out of range 0..{sides}")));
        }
        self.sets.insert_side(name, element, side);
        Ok(())
    }

    /// Create an empty node set so it survives a write with no members.
    pub fn declare_node_set(&mut self, name: &str) {
        self.sets.declare_node_set(name);
    }

    /// Create an empty side set.
    pub fn declare_side_set(&mut self, name: &str) {
        self.sets.declare_side_set(name);
    }

    fn section_mut(&mut self, name: &str) -> Result<&mut Section<f64>, MeshFractureError> {
        self.fields
            .get_mut(name)
            .ok_or_else(|| MeshFractureError::Config(format!("missing field {name}")))
    }

    /// Number of live entities of `rank`.
    pub fn count(&self, rank: EntityRank) -> usize {
        self.records.values().filter(|r| r.rank == rank).count()
    }

    pub fn num_entities(&self) -> usize {
        self.records.len()
    }

    pub fn num_relations(&self) -> usize {
        self.adjacency_out.values().map(Vec::len).sum()
    }

    fn require_modification(&self, op: &'static str) -> Result<(), MeshFractureError> {
        if self.modifying {
            Ok(())
        } else {
            Err(MeshFractureError::OutsideModification(op))
        }
    }

    fn link(&mut self, src: EntityKey, dst: EntityKey, local_id: LocalId) -> Result<(), MeshFractureError> {
        let src_rank = self.rank(src)?;
        let dst_rank = self.rank(dst)?;
        if src_rank <= dst_rank {
            return Err(MeshFractureError::RelationRankMismatch {
                src,
                dst,
                src_rank,
                dst_rank,
            });
        }
        let outs = self.adjacency_out.entry(src).or_default();
        match outs.binary_search_by_key(&dst, |(q, _)| *q) {
            Ok(_) => return Err(MeshFractureError::DuplicateRelation { src, dst }),
            Err(pos) => outs.insert(pos, (dst, local_id)),
        }
        let ins = self.adjacency_in.entry(dst).or_default();
        if let Err(pos) = ins.binary_search_by_key(&src, |(q, _)| *q) {
            ins.insert(pos, (src, local_id));
        }
        Ok(())
    }

    #[inline]
    fn remove(vec: &mut Vec<(EntityKey, LocalId)>, key: EntityKey) -> Option<LocalId> {
        match vec.binary_search_by_key(&key, |(q, _)| *q) {
            Ok(pos) => Some(vec.remove(pos).1),
            Err(_) => None,
        }
    }

    fn relation_count(&self, key: EntityKey) -> usize {
        self.adjacency_out.get(&key).map_or(0, Vec::len)
            + self.adjacency_in.get(&key).map_or(0, Vec::len)
    }

    /// Check that every outgoing list is mirrored by an incoming one.
    pub fn validate_mirrors(&self) -> Result<(), MeshFractureError> {
        for (&src, outs) in &self.adjacency_out {
            for &(dst, local_id) in outs {
                let mirrored = self
                    .adjacency_in
                    .get(&dst)
                    .is_some_and(|ins| ins.contains(&(src, local_id)));
                if !mirrored {
                    return Err(MeshFractureError::MissingRelation { src, dst, local_id });
                }
            }
        }
        for (&dst, ins) in &self.adjacency_in {
            for &(src, local_id) in ins {
                let mirrored = self
                    .adjacency_out
                    .get(&src)
                    .is_some_and(|outs| outs.contains(&(dst, local_id)));
                if !mirrored {
                    return Err(MeshFractureError::MissingRelation { src, dst, local_id });
                }
            }
        }
        Ok(())
    }
}

fn relations_of(
    map: &BTreeMap<EntityKey, Vec<(EntityKey, LocalId)>>,
    key: EntityKey,
    outgoing: bool,
) -> Vec<Relation> {
    map.get(&key)
        .map(|v| {
            v.iter()
                .map(|&(other, id)| {
                    if outgoing {
                        Relation::new(key, other, id)
                    } else {
                        Relation::new(other, key, id)
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

impl EntityStore for InMemoryEntityStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn entities(&self, rank: EntityRank) -> Vec<EntityKey> {
        self.records
            .iter()
            .filter(|(_, r)| r.rank == rank)
            .map(|(&k, _)| k)
            .collect()
    }

    fn contains(&self, key: EntityKey) -> bool {
        self.records.contains_key(&key)
    }

    fn rank(&self, key: EntityKey) -> Result<EntityRank, MeshFractureError> {
        self.records
            .get(&key)
            .map(|r| r.rank)
            .ok_or(MeshFractureError::UnknownEntity { key })
    }

    fn is_owned(&self, key: EntityKey) -> Result<bool, MeshFractureError> {
        self.records
            .get(&key)
            .map(|r| r.owned)
            .ok_or(MeshFractureError::UnknownEntity { key })
    }

    fn cell_type(&self, key: EntityKey) -> Option<CellType> {
        self.records.get(&key).and_then(|r| r.cell_type)
    }

    fn cone(&self, key: EntityKey) -> Vec<Relation> {
        relations_of(&self.adjacency_out, key, true)
    }

    fn support(&self, key: EntityKey) -> Vec<Relation> {
        relations_of(&self.adjacency_in, key, false)
    }

    fn declare_relation(
        &mut self,
        src: EntityKey,
        dst: EntityKey,
        local_id: LocalId,
    ) -> Result<(), MeshFractureError> {
        self.require_modification("declare_relation")?;
        self.link(src, dst, local_id)
    }

    fn destroy_relation(
        &mut self,
        src: EntityKey,
        dst: EntityKey,
        local_id: LocalId,
    ) -> Result<(), MeshFractureError> {
        self.require_modification("destroy_relation")?;
        let exists = self
            .adjacency_out
            .get(&src)
            .is_some_and(|outs| outs.contains(&(dst, local_id)));
        if !exists {
            return Err(MeshFractureError::MissingRelation { src, dst, local_id });
        }
        if let Some(outs) = self.adjacency_out.get_mut(&src) {
            Self::remove(outs, dst);
        }
        if let Some(ins) = self.adjacency_in.get_mut(&dst) {
            Self::remove(ins, src);
        }
        Ok(())
    }

    fn generate_entities(
        &mut self,
        rank: EntityRank,
        count: usize,
    ) -> Result<Vec<EntityKey>, MeshFractureError> {
        self.require_modification("generate_entities")?;
        if rank.as_usize() > self.dimension {
            return Err(MeshFractureError::UnsupportedDimension(rank.as_usize()));
        }
        let cell_type = match rank {
            EntityRank::NODE => Some(CellType::Vertex),
            EntityRank::EDGE => Some(CellType::Segment),
            _ => None,
        };
        let mut keys = Vec::with_capacity(count);
        for _ in 0..count {
            let key = EntityKey::new(self.next_key)?;
            self.insert_record(key, EntityRecord::new(rank, cell_type))?;
            keys.push(key);
        }
        Ok(keys)
    }

    fn destroy_entity(&mut self, key: EntityKey) -> Result<(), MeshFractureError> {
        self.require_modification("destroy_entity")?;
        if !self.records.contains_key(&key) {
            return Err(MeshFractureError::UnknownEntity { key });
        }
        let count = self.relation_count(key);
        if count > 0 {
            return Err(MeshFractureError::EntityHasRelations { key, count });
        }
        self.records.remove(&key);
        self.adjacency_out.remove(&key);
        self.adjacency_in.remove(&key);
        for section in self.fields.values_mut() {
            section.remove_point(key);
        }
        self.sets.remove_entity(key);
        Ok(())
    }

    fn set_cell_type(&mut self, key: EntityKey, cell_type: CellType) -> Result<(), MeshFractureError> {
        self.records
            .get_mut(&key)
            .map(|r| r.cell_type = Some(cell_type))
            .ok_or(MeshFractureError::UnknownEntity { key })
    }

    fn copy_entity_fields(&mut self, from: EntityKey, to: EntityKey) -> Result<(), MeshFractureError> {
        for key in [from, to] {
            if !self.records.contains_key(&key) {
                return Err(MeshFractureError::UnknownEntity { key });
            }
        }
        for section in self.fields.values_mut() {
            section.copy_point(from, to)?;
        }
        Ok(())
    }

    fn copy_set_membership(&mut self, from: EntityKey, to: EntityKey) -> Result<(), MeshFractureError> {
        for key in [from, to] {
            if self.rank(key)? != EntityRank::NODE {
                return Err(MeshFractureError::SetMember {
                    set: self.sets.node_sets_of(from).join(","),
                    key,
                    reason: "not a node".into(),
                });
            }
        }
        let copied = self.sets.copy_node_membership(from, to);
        if copied > 0 {
            log::trace!("{to} joined {copied} node sets of {from}");
        }
        Ok(())
    }

    fn begin_modification(&mut self) -> Result<(), MeshFractureError> {
        if self.modifying {
            return Err(MeshFractureError::ModificationAlreadyOpen);
        }
        self.modifying = true;
        Ok(())
    }

    fn end_modification(&mut self) -> Result<(), MeshFractureError> {
        self.require_modification("end_modification")?;
        self.modifying = false;
        Ok(())
    }

    fn in_modification(&self) -> bool {
        self.modifying
    }
}
