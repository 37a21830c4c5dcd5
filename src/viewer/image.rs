//! Selected image handling and metadata probing.
//!
//! The viewer cannot render a bitmap in the terminal, so the "image pane"
//! shows the metadata gathered here instead: file name, format, pixel
//! dimensions and size on disk.

use anyhow::bail;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions the transcription service accepts.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// The image file currently selected for transcription.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub path: PathBuf,
    pub file_name: String,
    /// MIME type derived from the file extension
    pub mime: &'static str,
    pub size_bytes: u64,
    /// Pixel dimensions (width, height), if the header could be parsed
    pub dimensions: Option<(u32, u32)>,
}

impl SelectedImage {
    /// Loads image metadata from a local file path.
    ///
    /// Only probes the header for dimensions; the file bytes are read later
    /// when the request is actually sent.
    ///
    /// # Errors
    /// - If the file does not exist
    /// - If the extension is not png/jpg/jpeg
    /// - If file metadata cannot be read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            bail!("Image file not found: {}", path.display());
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            bail!("Unsupported image type '{extension}'. Supported: png, jpg, jpeg");
        }

        let mime = match extension.as_str() {
            "png" => "image/png",
            _ => "image/jpeg",
        };

        let size_bytes = fs::metadata(path)?.len();

        let dimensions = match image::image_dimensions(path) {
            Ok(dims) => Some(dims),
            Err(e) => {
                tracing::warn!("Could not read image dimensions of {}: {e}", path.display());
                None
            }
        };

        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime,
            size_bytes,
            dimensions,
        })
    }

    /// Human-readable size, e.g. "248.1 KB".
    pub fn size_display(&self) -> String {
        let bytes = self.size_bytes as f64;
        if bytes >= 1024.0 * 1024.0 {
            format!("{:.1} MB", bytes / (1024.0 * 1024.0))
        } else if bytes >= 1024.0 {
            format!("{:.1} KB", bytes / 1024.0)
        } else {
            format!("{} B", self.size_bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_rejected() {
        let err = SelectedImage::load(Path::new("/nonexistent/page.png")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let path = std::env::temp_dir().join("scrive-test-note.txt");
        fs::write(&path, b"not an image").unwrap();
        let err = SelectedImage::load(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported image type"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_loads_metadata_for_png_path() {
        let path = std::env::temp_dir().join("scrive-test-page.PNG");
        fs::write(&path, b"fake bytes").unwrap();
        let img = SelectedImage::load(&path).unwrap();
        assert_eq!(img.mime, "image/png");
        assert_eq!(img.size_bytes, 10);
        // Not a real PNG, so header probing yields no dimensions
        assert!(img.dimensions.is_none());
        assert_eq!(img.file_name, "scrive-test-page.PNG");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_size_display_units() {
        let mut img = SelectedImage {
            path: PathBuf::from("page.png"),
            file_name: "page.png".to_string(),
            mime: "image/png",
            size_bytes: 512,
            dimensions: None,
        };
        assert_eq!(img.size_display(), "512 B");
        img.size_bytes = 254_000;
        assert_eq!(img.size_display(), "248.0 KB");
        img.size_bytes = 3 * 1024 * 1024;
        assert_eq!(img.size_display(), "3.0 MB");
    }
}
