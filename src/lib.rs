pub mod config;
pub mod grid;
pub mod heightmap;
pub mod rivers;
pub mod tile;
pub mod world;

pub use config::{GenerationConfig, Palette, seed_from_str};
pub use grid::Grid;
pub use heightmap::generate_elevation;
pub use tile::TileType;
pub use world::WorldGrid;
