use std::path::Path;
use std::sync::Arc;

use crate::error::IngestError;

/// A named, still-encoded image handed to the ingest service.
#[derive(Clone, Debug)]
pub struct Upload {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn read(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| IngestError::Read(e, path.display().to_string()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    /// Lower-cased file extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lower_cased() {
        let upload = Upload::new("scan.TIFF", Vec::new());
        assert_eq!(upload.extension().as_deref(), Some("tiff"));
        assert_eq!(Upload::new("scan", Vec::new()).extension(), None);
    }

    #[tokio::test]
    async fn reading_a_missing_file_reports_the_path() {
        let err = Upload::read("does/not/exist.png").await.unwrap_err();
        assert!(matches!(err, IngestError::Read(_, ref path) if path.ends_with("exist.png")));
    }
}
