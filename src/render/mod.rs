pub mod colormap;
pub mod surface;

pub use colormap::ColorScale;
pub use surface::{build_mesh, Camera, SurfaceGrid};
