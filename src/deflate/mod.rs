pub mod inflater;
pub mod tables;

pub use inflater::{BlockSummary, BlockType, InflateStats, Inflater};
