pub mod grid;
pub mod schema;

pub use grid::StatGrid;
