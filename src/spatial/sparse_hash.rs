//! Sparse hash grid for efficient spatial queries

use ahash::{AHashMap, AHashSet};
use glam::Vec2;

use crate::core::types::BodyId;
use crate::spatial::shape::Shape;

type Cell = (i32, i32);

/// Bodies whose bounding box spans more cells than this skip the cells and
/// live in the overflow list instead
pub const MAX_CELLS_PER_BODY: u64 = 64;

/// Sparse hash grid indexing bodies by the cells their bounding box covers
///
/// The grid is a broad phase only: queries return candidates whose cells
/// intersect the query's bounding box, and callers run the exact test.
/// Oversized bodies are returned by every query.
#[derive(Debug, Clone)]
pub struct SparseHashGrid {
    cell_size: f32,
    cells: AHashMap<Cell, Vec<BodyId>>,
    overflow: Vec<BodyId>,
}

impl SparseHashGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: AHashMap::new(),
            overflow: Vec::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> Cell {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Inclusive cell corners of the shape's bounding box
    fn cell_range(&self, shape: &Shape) -> (Cell, Cell) {
        let (min, max) = shape.aabb();
        (self.cell_coord(min), self.cell_coord(max))
    }

    fn span((x0, y0): Cell, (x1, y1): Cell) -> u64 {
        let w = (i64::from(x1) - i64::from(x0) + 1) as u64;
        let h = (i64::from(y1) - i64::from(y0) + 1) as u64;
        w.saturating_mul(h)
    }

    fn cells_between((x0, y0): Cell, (x1, y1): Cell) -> impl Iterator<Item = Cell> {
        (x0..=x1).flat_map(move |x| (y0..=y1).map(move |y| (x, y)))
    }

    fn is_oversized(&self, shape: &Shape) -> bool {
        let (lo, hi) = self.cell_range(shape);
        Self::span(lo, hi) > MAX_CELLS_PER_BODY
    }

    pub fn insert(&mut self, body: BodyId, shape: &Shape) {
        let (lo, hi) = self.cell_range(shape);
        if Self::span(lo, hi) > MAX_CELLS_PER_BODY {
            self.overflow.push(body);
            return;
        }
        for coord in Self::cells_between(lo, hi) {
            self.cells.entry(coord).or_default().push(body);
        }
    }

    /// Remove a body previously inserted with `shape`
    pub fn remove(&mut self, body: BodyId, shape: &Shape) {
        if self.is_oversized(shape) {
            self.overflow.retain(|&b| b != body);
            return;
        }
        let (lo, hi) = self.cell_range(shape);
        for coord in Self::cells_between(lo, hi) {
            if let Some(cell) = self.cells.get_mut(&coord) {
                cell.retain(|&b| b != body);
                if cell.is_empty() {
                    self.cells.remove(&coord);
                }
            }
        }
    }

    /// Reindex a body whose extent changed from `old` to `new`
    pub fn relocate(&mut self, body: BodyId, old: &Shape, new: &Shape) {
        self.remove(body, old);
        self.insert(body, new);
    }

    /// Every body sharing at least one cell with `shape`, plus every
    /// oversized body, without duplicates
    pub fn candidates(&self, shape: &Shape) -> AHashSet<BodyId> {
        let (lo, hi) = self.cell_range(shape);
        let mut found: AHashSet<BodyId> = self.overflow.iter().copied().collect();

        // Cheaper to walk what is occupied than every covered cell
        if Self::span(lo, hi) > self.cells.len() as u64 {
            let ((x0, y0), (x1, y1)) = (lo, hi);
            found.extend(
                self.cells
                    .iter()
                    .filter(|((x, y), _)| (x0..=x1).contains(x) && (y0..=y1).contains(y))
                    .flat_map(|(_, bodies)| bodies.iter().copied()),
            );
        } else {
            found.extend(
                Self::cells_between(lo, hi)
                    .filter_map(|coord| self.cells.get(&coord))
                    .flatten()
                    .copied(),
            );
        }
        found
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }
}
