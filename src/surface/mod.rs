pub mod height_map;
pub mod roughness;

pub use height_map::HeightMap;
pub use roughness::{analyze, RoughnessReport};
