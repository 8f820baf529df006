use egui::{Align2, Color32, FontId, Pos2, Sense, Shape};
use uuid::Uuid;

use crate::app::views::View;
use crate::common::Scan;
use crate::render::{build_mesh, Camera, ColorScale, SurfaceGrid};

/// Interactive 3-D topography of the current scan.
pub struct SurfaceView {
    grid: Option<(Uuid, Option<SurfaceGrid>)>,
    camera: Camera,
    scale: ColorScale,
    max_resolution: usize,
    height: f32,
}

impl SurfaceView {
    pub fn new(max_resolution: usize, height: f32) -> Self {
        Self {
            grid: None,
            camera: Camera::default(),
            scale: ColorScale::default(),
            max_resolution,
            height,
        }
    }

    pub fn set_scan(&mut self, scan: Option<&Scan>) {
        self.grid = scan.map(|scan| {
            (
                scan.id(),
                SurfaceGrid::sample(scan.height_map(), self.max_resolution),
            )
        });
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Azimuth:");
            ui.add(egui::Slider::new(&mut self.camera.azimuth, 0.0..=360.0).suffix("°"));
            ui.label("Elevation:");
            ui.add(egui::Slider::new(&mut self.camera.elevation, 5.0..=90.0).suffix("°"));
        });
        ui.horizontal(|ui| {
            ui.label("Z Exag:");
            ui.add(egui::Slider::new(&mut self.camera.z_exaggeration, 0.1..=5.0));
            egui::ComboBox::from_id_salt("surface_colorscale")
                .selected_text(self.scale.name())
                .show_ui(ui, |ui| {
                    for scale in ColorScale::ALL {
                        ui.selectable_value(&mut self.scale, *scale, scale.name());
                    }
                });
        });
    }
}

impl View for SurfaceView {
    fn draw(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label("3D Topography");
            self.draw_controls(ui);

            let size = egui::vec2(ui.available_width(), self.height);
            let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
            painter.rect_filled(response.rect, 0.0, Color32::from_gray(20));

            let grid = match &self.grid {
                Some((_, Some(grid))) => grid,
                Some((_, None)) => {
                    painter.text(
                        response.rect.center(),
                        Align2::CENTER_CENTER,
                        "Image too small for a surface plot",
                        FontId::proportional(14.0),
                        Color32::GRAY,
                    );
                    return;
                }
                None => return,
            };

            if response.dragged() {
                let delta = response.drag_delta();
                self.camera.orbit(delta.x, delta.y);
            }

            let mesh = build_mesh(grid, &self.camera, response.rect, self.scale);
            painter.add(Shape::mesh(mesh));

            let (z_min, z_max) = grid.z_range();
            painter.text(
                Pos2::new(response.rect.left() + 8.0, response.rect.top() + 4.0),
                Align2::LEFT_TOP,
                format!(
                    "x: column, y: row ({}x{} shown)  z: {:.1}..{:.1}  Az={:.0}° El={:.0}°",
                    grid.cols(),
                    grid.rows(),
                    z_min,
                    z_max,
                    self.camera.azimuth,
                    self.camera.elevation,
                ),
                FontId::monospace(10.0),
                Color32::LIGHT_GRAY,
            );
        });
    }
}
