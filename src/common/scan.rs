use chrono::{DateTime, Utc};
use image::DynamicImage;
use std::sync::Arc;
use uuid::Uuid;

use crate::surface::HeightMap;

/// One decoded upload together with the height map derived from it.
#[derive(Debug, Clone)]
pub struct Scan {
    id: Uuid,
    name: String,
    image: Arc<DynamicImage>,
    height_map: Arc<HeightMap>,
    captured_at: DateTime<Utc>,
}

impl Scan {
    pub fn new(name: impl Into<String>, image: DynamicImage, height_map: HeightMap) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            image: Arc::new(image),
            height_map: Arc::new(height_map),
            captured_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &Arc<DynamicImage> {
        &self.image
    }

    pub fn height_map(&self) -> &HeightMap {
        &self.height_map
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn cloning_scan_shares_image_and_height_map() {
        let gray = GrayImage::from_pixel(16, 16, Luma([9]));
        let height_map = HeightMap::from_luma(&gray);
        let s1 = Scan::new("flat.png", DynamicImage::ImageLuma8(gray), height_map);
        let s2 = s1.clone();
        assert_eq!(s1.id(), s2.id());
        assert!(Arc::ptr_eq(&s1.image, &s2.image));
        assert!(Arc::ptr_eq(&s1.height_map, &s2.height_map));
    }

    #[test]
    fn scans_get_distinct_ids() {
        let a = Scan::new("a.png", DynamicImage::new_luma8(1, 1), HeightMap::empty());
        let b = Scan::new("b.png", DynamicImage::new_luma8(1, 1), HeightMap::empty());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), "a.png");
    }

    #[test]
    fn debug_output_names_the_scan() {
        let scan = Scan::new("grain.png", DynamicImage::new_luma8(1, 1), HeightMap::empty());
        let rendered = format!("{scan:?}");
        assert!(rendered.contains("grain.png"));
        assert!(rendered.contains(&scan.id().to_string()));
    }
}
