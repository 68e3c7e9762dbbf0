//! Scene: the bodies physically present in a world
//!
//! Bodies are iterated in insertion order. Overlap queries go through a
//! sparse hash grid and then the exact shape test, and their results keep
//! the same insertion order so repeated runs see bodies identically.

use std::collections::{btree_map, BTreeMap};

use ahash::AHashMap;
use glam::Vec2;

use crate::core::types::BodyId;
use crate::entity::body::Body;
use crate::spatial::shape::Shape;
use crate::spatial::sparse_hash::SparseHashGrid;

pub const DEFAULT_CELL_SIZE: f32 = 50.0;

#[derive(Debug)]
struct Slot {
    seq: u64,
    body: Body,
}

#[derive(Debug)]
pub struct Scene {
    slots: AHashMap<BodyId, Slot>,
    order: BTreeMap<u64, BodyId>,
    next_seq: u64,
    grid: SparseHashGrid,
}

impl Scene {
    pub fn new(cell_size: f32) -> Self {
        Self {
            slots: AHashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
            grid: SparseHashGrid::new(cell_size),
        }
    }

    /// Place a body. `false` when a body with the same id is already here.
    pub fn add(&mut self, body: Body) -> bool {
        self.insert(body).is_ok()
    }

    /// Like [`Scene::add`] but hands the body back on failure
    pub(crate) fn insert(&mut self, body: Body) -> Result<(), Body> {
        let id = body.id();
        if self.slots.contains_key(&id) {
            return Err(body);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.grid.insert(id, body.shape());
        self.order.insert(seq, id);
        self.slots.insert(id, Slot { seq, body });
        Ok(())
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let slot = self.slots.remove(&id)?;
        self.order.remove(&slot.seq);
        self.grid.remove(id, slot.body.shape());
        Some(slot.body)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.slots.get(&id).map(|slot| &slot.body)
    }

    /// Mutable access for the tick; moving a body must go through
    /// [`Scene::translate`] instead
    pub(crate) fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.slots.get_mut(&id).map(|slot| &mut slot.body)
    }

    /// Move a body and keep the spatial index in step
    pub fn translate(&mut self, id: BodyId, delta: Vec2) -> bool {
        let Some(slot) = self.slots.get_mut(&id) else {
            return false;
        };
        let old = *slot.body.shape();
        slot.body.translate(delta);
        self.grid.relocate(id, &old, slot.body.shape());
        true
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bodies in insertion order
    pub fn iter(&self) -> Bodies<'_> {
        Bodies {
            order: self.order.values(),
            slots: &self.slots,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.order.values().copied()
    }

    /// Bodies whose shape overlaps `shape`, boundaries included
    pub fn partly_in(&self, shape: &Shape) -> SceneView<'_> {
        let mut hits: Vec<(u64, BodyId)> = self
            .grid
            .candidates(shape)
            .into_iter()
            .filter_map(|id| self.slots.get(&id).map(|slot| (id, slot)))
            .filter(|(_, slot)| slot.body.shape().overlaps(shape))
            .map(|(id, slot)| (slot.seq, id))
            .collect();
        hits.sort_unstable_by_key(|(seq, _)| *seq);
        SceneView {
            scene: self,
            ids: hits.into_iter().map(|(_, id)| id).collect(),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

/// Insertion-ordered iterator over a scene's bodies
pub struct Bodies<'a> {
    order: btree_map::Values<'a, u64, BodyId>,
    slots: &'a AHashMap<BodyId, Slot>,
}

impl<'a> Iterator for Bodies<'a> {
    type Item = &'a Body;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        self.slots.get(id).map(|slot| &slot.body)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

/// Result of an overlap query, borrowed from its scene
#[derive(Debug, Clone)]
pub struct SceneView<'a> {
    scene: &'a Scene,
    ids: Vec<BodyId>,
}

impl<'a> SceneView<'a> {
    pub fn ids(&self) -> &[BodyId] {
        &self.ids
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Body> + '_ {
        let scene = self.scene;
        self.ids.iter().filter_map(move |id| scene.get(*id))
    }

    /// Narrow the view to bodies that also overlap `shape`
    pub fn partly_in(&self, shape: &Shape) -> SceneView<'a> {
        let scene = self.scene;
        SceneView {
            scene,
            ids: self
                .ids
                .iter()
                .copied()
                .filter(|id| scene.get(*id).is_some_and(|b| b.shape().overlaps(shape)))
                .collect(),
        }
    }
}
