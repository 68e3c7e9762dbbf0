//! Per-tick machinery: perception, the heart and the tick itself

pub mod heart;
pub mod perception;
pub mod tick;

pub use heart::{Fifo, Heart, MovementFirst, PulseReport, ResolutionPolicy};
pub use perception::{Percept, Sensor, ShapeSensor};
pub use tick::TickReport;
