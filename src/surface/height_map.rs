use image::GrayImage;

use crate::error::InvalidInputError;

/// A row-major grid of surface elevation samples.
///
/// An empty map is a valid value; the roughness analyzer is the one that
/// refuses it.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    rows: usize,
    cols: usize,
    samples: Vec<f64>,
}

impl HeightMap {
    pub fn new(rows: usize, cols: usize, samples: Vec<f64>) -> Result<Self, InvalidInputError> {
        if rows.checked_mul(cols) != Some(samples.len()) {
            return Err(InvalidInputError::ShapeMismatch {
                rows,
                cols,
                samples: samples.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            samples,
        })
    }

    pub fn empty() -> Self {
        Self {
            rows: 0,
            cols: 0,
            samples: Vec::new(),
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, InvalidInputError> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        let mut samples = Vec::with_capacity(expected * rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(InvalidInputError::RaggedRow {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            samples.extend_from_slice(row);
        }
        // A list of empty rows carries no samples at all.
        if expected == 0 {
            return Ok(Self::empty());
        }
        Self::new(rows.len(), expected, samples)
    }

    /// Copies 8-bit luminance values; row = image y, col = image x.
    pub fn from_luma(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            rows: height as usize,
            cols: width as usize,
            samples: image.as_raw().iter().map(|&v| f64::from(v)).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.samples.get(row * self.cols + col).copied()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks panics on zero, an empty map has no rows anyway
        self.samples.chunks(self.cols.max(1))
    }

    pub fn shifted(&self, offset: f64) -> Self {
        self.map(|v| v + offset)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            samples: self.samples.iter().map(|&v| f(v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn from_rows_keeps_row_major_order() {
        let map = HeightMap::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(map.rows(), 2);
        assert_eq!(map.cols(), 3);
        assert_eq!(map.get(1, 0), Some(4.0));
        assert_eq!(map.get(0, 2), Some(3.0));
        assert_eq!(map.get(2, 0), None);
        assert_eq!(map.get(0, 3), None);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = HeightMap::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            InvalidInputError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn from_rows_of_nothing_is_empty() {
        assert!(HeightMap::from_rows(Vec::new()).unwrap().is_empty());
        assert!(HeightMap::from_rows(vec![vec![], vec![]]).unwrap().is_empty());
    }

    #[test]
    fn new_checks_shape() {
        assert!(HeightMap::new(2, 2, vec![0.0; 4]).is_ok());
        assert!(matches!(
            HeightMap::new(2, 3, vec![0.0; 4]),
            Err(InvalidInputError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn from_luma_maps_pixels_to_samples() {
        let mut image = GrayImage::new(3, 2);
        image.put_pixel(2, 1, Luma([200]));
        let map = HeightMap::from_luma(&image);
        assert_eq!((map.rows(), map.cols()), (2, 3));
        assert_eq!(map.get(1, 2), Some(200.0));
        assert_eq!(map.get(0, 0), Some(0.0));
    }

    #[test]
    fn iter_rows_yields_each_row() {
        let map = HeightMap::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let rows: Vec<&[f64]> = map.iter_rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0][..], &[3.0, 4.0][..]]);
        assert_eq!(HeightMap::empty().iter_rows().count(), 0);
    }
}
