//! Orthographic projection of a height map into a coloured triangle mesh.
//!
//! Plot x is the column index, plot y the row index and plot height the
//! sample value. Quads are emitted back to front so the painter can draw the
//! mesh without a depth buffer.

use egui::{Mesh, Pos2, Rect};

use crate::render::colormap::ColorScale;
use crate::surface::HeightMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Degrees around the vertical axis.
    pub azimuth: f32,
    /// Degrees above the plot plane (0 = side, 90 = top).
    pub elevation: f32,
    pub z_exaggeration: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            azimuth: 225.0,
            elevation: 35.0,
            z_exaggeration: 1.0,
        }
    }
}

impl Camera {
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth = (self.azimuth + dx * 0.5).rem_euclid(360.0);
        self.elevation = (self.elevation - dy * 0.3).clamp(5.0, 90.0);
    }
}

/// A stride-downsampled copy of a height map with heights normalized to [0, 1].
#[derive(Debug, Clone)]
pub struct SurfaceGrid {
    row_indices: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<f64>,
    z_min: f64,
    z_max: f64,
}

impl SurfaceGrid {
    /// Returns `None` when the map is too small to form a single quad.
    pub fn sample(map: &HeightMap, max_resolution: usize) -> Option<Self> {
        if map.rows() < 2 || map.cols() < 2 {
            return None;
        }
        let max_resolution = max_resolution.max(2);
        let longest = map.rows().max(map.cols());
        let stride = longest.div_ceil(max_resolution).max(1);
        let row_indices = axis_indices(map.rows(), stride);
        let col_indices = axis_indices(map.cols(), stride);

        let mut raw = Vec::with_capacity(row_indices.len() * col_indices.len());
        for &r in &row_indices {
            for &c in &col_indices {
                raw.push(map.get(r, c).filter(|v| v.is_finite()));
            }
        }

        let (z_min, z_max) = raw
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if !z_min.is_finite() {
            return None;
        }
        let range = z_max - z_min;
        let values = raw
            .into_iter()
            .map(|v| match v {
                // flat surfaces sit mid-scale
                Some(_) if range < 1e-12 => 0.5,
                Some(v) => (v - z_min) / range,
                None => 0.0,
            })
            .collect();

        Some(Self {
            row_indices,
            col_indices,
            values,
            z_min,
            z_max,
        })
    }

    pub fn rows(&self) -> usize {
        self.row_indices.len()
    }

    pub fn cols(&self) -> usize {
        self.col_indices.len()
    }

    pub fn z_range(&self) -> (f64, f64) {
        (self.z_min, self.z_max)
    }

    /// Normalized height at a sampled grid position.
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols() + col]
    }

    /// Source column/row index of a sampled grid position.
    pub fn source_index(&self, row: usize, col: usize) -> (usize, usize) {
        (self.row_indices[row], self.col_indices[col])
    }
}

fn axis_indices(len: usize, stride: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).step_by(stride).collect();
    if indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}

pub fn build_mesh(grid: &SurfaceGrid, camera: &Camera, rect: Rect, scale: ColorScale) -> Mesh {
    let az = f64::from(camera.azimuth).to_radians();
    let el = f64::from(camera.elevation).to_radians();
    let (sin_az, cos_az) = az.sin_cos();
    let (sin_el, cos_el) = el.sin_cos();
    let z_exag = f64::from(camera.z_exaggeration);

    // Fit the longest axis into [-0.5, 0.5] using source indices so the
    // aspect ratio survives downsampling.
    let last_row = *grid.row_indices.last().unwrap_or(&0) as f64;
    let last_col = *grid.col_indices.last().unwrap_or(&0) as f64;
    let span = last_row.max(last_col).max(1.0);

    let center = rect.center();
    let canvas_scale = f64::from(rect.width().min(rect.height())) * 0.42;

    let mut mesh = Mesh::default();
    let mut depths = Vec::with_capacity(grid.values.len());
    for (gr, &r) in grid.row_indices.iter().enumerate() {
        for (gc, &c) in grid.col_indices.iter().enumerate() {
            let t = grid.value(gr, gc);
            let x3 = (c as f64 - last_col * 0.5) / span;
            let y3 = (r as f64 - last_row * 0.5) / span;
            let z3 = (t - 0.5) * 0.5 * z_exag;

            let xr = x3 * cos_az - y3 * sin_az;
            let yr = x3 * sin_az + y3 * cos_az;
            let x_screen = xr;
            let y_screen = -yr * sin_el - z3 * cos_el;
            depths.push(yr * cos_el - z3 * sin_el);

            let pos = Pos2::new(
                (f64::from(center.x) + x_screen * canvas_scale) as f32,
                (f64::from(center.y) + y_screen * canvas_scale) as f32,
            );
            mesh.colored_vertex(pos, scale.evaluate(t));
        }
    }

    let cols = grid.cols();
    let mut quads = Vec::with_capacity((grid.rows() - 1) * (cols - 1));
    for gr in 0..grid.rows() - 1 {
        for gc in 0..cols - 1 {
            let a = gr * cols + gc;
            let b = a + 1;
            let c = a + cols;
            let d = c + 1;
            let depth = (depths[a] + depths[b] + depths[c] + depths[d]) * 0.25;
            quads.push((depth, [a as u32, b as u32, c as u32, d as u32]));
        }
    }
    // farthest first
    quads.sort_by(|l, r| r.0.total_cmp(&l.0));
    for (_, [a, b, c, d]) in quads {
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(b, d, c);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn ramp(rows: usize, cols: usize) -> HeightMap {
        let samples = (0..rows * cols).map(|i| (i % cols) as f64).collect();
        HeightMap::new(rows, cols, samples).unwrap()
    }

    fn canvas() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(400.0, 300.0))
    }

    #[test]
    fn tiny_maps_cannot_be_plotted() {
        assert!(SurfaceGrid::sample(&ramp(1, 10), 32).is_none());
        assert!(SurfaceGrid::sample(&HeightMap::empty(), 32).is_none());
    }

    #[test]
    fn large_maps_are_downsampled_but_keep_edges() {
        let grid = SurfaceGrid::sample(&ramp(300, 200), 50).unwrap();
        assert!(grid.rows() <= 51);
        assert!(grid.cols() <= 51);
        assert_eq!(grid.source_index(grid.rows() - 1, grid.cols() - 1), (299, 199));
        assert_eq!(grid.z_range(), (0.0, 199.0));
        assert_eq!(grid.value(0, 0), 0.0);
        assert_eq!(grid.value(0, grid.cols() - 1), 1.0);
    }

    #[test]
    fn thin_strip_keeps_two_rows() {
        let grid = SurfaceGrid::sample(&ramp(2, 1000), 96).unwrap();
        assert_eq!(grid.rows(), 2);
    }

    #[test]
    fn flat_map_renders_mid_scale() {
        let map = HeightMap::new(3, 3, vec![4.0; 9]).unwrap();
        let grid = SurfaceGrid::sample(&map, 32).unwrap();
        assert!((0..3).all(|r| (0..3).all(|c| grid.value(r, c) == 0.5)));
    }

    #[test]
    fn mesh_has_two_triangles_per_quad() {
        let grid = SurfaceGrid::sample(&ramp(5, 4), 32).unwrap();
        let mesh = build_mesh(&grid, &Camera::default(), canvas(), ColorScale::Viridis);
        assert_eq!(mesh.vertices.len(), 20);
        assert_eq!(mesh.indices.len(), 4 * 3 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn mesh_stays_inside_canvas() {
        let grid = SurfaceGrid::sample(&ramp(40, 60), 32).unwrap();
        for azimuth in [0.0, 90.0, 225.0, 315.0] {
            let camera = Camera {
                azimuth,
                ..Camera::default()
            };
            let mesh = build_mesh(&grid, &camera, canvas(), ColorScale::Magma);
            assert!(mesh.vertices.iter().all(|v| canvas().contains(v.pos)));
        }
    }

    #[test]
    fn vertex_colors_follow_height() {
        let grid = SurfaceGrid::sample(&ramp(2, 2), 32).unwrap();
        let mesh = build_mesh(&grid, &Camera::default(), canvas(), ColorScale::Grayscale);
        assert_eq!(mesh.vertices[0].color, ColorScale::Grayscale.evaluate(0.0));
        assert_eq!(mesh.vertices[1].color, ColorScale::Grayscale.evaluate(1.0));
    }

    #[test]
    fn orbit_wraps_azimuth_and_clamps_elevation() {
        let mut camera = Camera::default();
        camera.orbit(400.0, 0.0);
        assert!((0.0..360.0).contains(&camera.azimuth));
        camera.orbit(0.0, 1000.0);
        assert_eq!(camera.elevation, 5.0);
        camera.orbit(0.0, -1000.0);
        assert_eq!(camera.elevation, 90.0);
    }
}
