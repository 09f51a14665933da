//! Edge-matching tiling model: instances, tiles and grids

pub mod grid;
pub mod instance;
pub mod io;

pub use grid::TilingGrid;
pub use instance::{parse_instance, parse_instance_strict, ColorId, Instance, ParseError, Tile};
pub use io::{create_example_instance, load_instance_from_file};
