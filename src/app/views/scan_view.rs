use egui::{TextureHandle, TextureOptions};
use uuid::Uuid;

use crate::app::views::View;
use crate::common::Scan;

pub struct ScanView {
    scan: Option<Scan>,
    texture: Option<(Uuid, TextureHandle)>,
    max_height: f32,
}

impl ScanView {
    pub fn new(max_height: f32) -> Self {
        Self {
            scan: None,
            texture: None,
            max_height,
        }
    }

    pub fn set_scan(&mut self, scan: Option<Scan>) {
        self.scan = scan;
    }

    fn texture(&mut self, ctx: &egui::Context, scan: &Scan) -> TextureHandle {
        match &self.texture {
            Some((id, handle)) if *id == scan.id() => handle.clone(),
            _ => {
                let image = scan.image().to_rgba8();
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [image.width() as usize, image.height() as usize],
                    image.as_raw().as_slice(),
                );
                let handle = ctx.load_texture(
                    format!("scan-{}", scan.id()),
                    color_image,
                    TextureOptions::default(),
                );
                self.texture = Some((scan.id(), handle.clone()));
                handle
            }
        }
    }
}

impl View for ScanView {
    fn draw(&mut self, ui: &mut egui::Ui) {
        let Some(scan) = self.scan.clone() else {
            ui.label("No scan loaded.");
            return;
        };
        ui.group(|ui| {
            ui.label(format!(
                "AFM Scan: {} ({}x{})",
                scan.name(),
                scan.image().width(),
                scan.image().height()
            ));
            let texture = self.texture(ui.ctx(), &scan);
            ui.add(
                egui::Image::new(&texture)
                    .max_width(ui.available_width())
                    .max_height(self.max_height)
                    .maintain_aspect_ratio(true),
            );
            ui.small(format!(
                "Loaded {}",
                scan.captured_at().format("%Y-%m-%d %H:%M:%S UTC")
            ));
        });
    }
}
