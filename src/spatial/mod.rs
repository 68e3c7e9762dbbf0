//! Shapes and the broad-phase index behind scene queries

pub mod shape;
pub mod sparse_hash;

pub use shape::Shape;
pub use sparse_hash::SparseHashGrid;
