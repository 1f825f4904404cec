pub mod colorizer;
pub mod merger;

pub use merger::merge_grids;
