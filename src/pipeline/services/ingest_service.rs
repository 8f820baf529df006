use image::{DynamicImage, GrayImage, Luma};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::Service;

use crate::common::Scan;
use crate::error::IngestError;
use crate::pipeline::types::Upload;
use crate::surface::HeightMap;

/// Decodes uploads and derives their height map from image luminance.
#[derive(Clone)]
pub struct IngestService {
    accepted_extensions: Arc<[String]>,
}

impl IngestService {
    pub fn new(accepted_extensions: &[String]) -> Self {
        Self {
            accepted_extensions: accepted_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn accepts(&self, upload: &Upload) -> bool {
        upload
            .extension()
            .is_some_and(|ext| self.accepted_extensions.iter().any(|a| *a == ext))
    }

    fn ingest(&self, upload: Upload) -> Result<Scan, IngestError> {
        if !self.accepts(&upload) {
            return Err(IngestError::UnsupportedFormat {
                name: upload.name,
                accepted: self.accepted_extensions.join(", "),
            });
        }
        let image = image::load_from_memory(&upload.bytes).map_err(|source| IngestError::Decode {
            name: upload.name.clone(),
            source,
        })?;
        let height_map = HeightMap::from_luma(&to_luma(&image));
        tracing::debug!(
            "Decoded '{}' into a {}x{} height map",
            upload.name,
            height_map.cols(),
            height_map.rows()
        );
        Ok(Scan::new(upload.name, image, height_map))
    }
}

/// ITU-R 601 luma with fixed-point rounding; alpha is dropped.
pub fn to_luma(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luma_601(r, g, b)])
    })
}

fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    ((19595 * u32::from(r) + 38470 * u32::from(g) + 7471 * u32::from(b) + 0x8000) >> 16) as u8
}

impl Service<Upload> for IngestService {
    type Response = Scan;
    type Error = IngestError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, upload: Upload) -> Self::Future {
        let service = self.clone();
        // decoding is CPU bound; keep it off the async workers
        Box::pin(async move { tokio::task::spawn_blocking(move || service.ingest(upload)).await? })
    }
}
