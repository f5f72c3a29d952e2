//! Reads console arguments from disk into session inputs.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::cli::commands::TextArg;
use crate::errors::InputError;
use crate::session::ImageFile;

/// Image content type from the file extension, or `None` for anything that is not an image.
pub fn image_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

pub async fn load_image(path: &Path) -> Result<ImageFile, InputError> {
    let display = path.display().to_string();
    let content_type =
        image_content_type(path).ok_or_else(|| InputError::NotAnImage(display.clone()))?;

    let bytes = tokio::fs::read(path).await.map_err(|source| InputError::Io {
        path: display.clone(),
        source,
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or(display);

    Ok(ImageFile::new(name, content_type, bytes))
}

/// Loads every readable image; non-images and unreadable files are skipped and reported.
pub async fn load_images(paths: &[PathBuf]) -> (Vec<ImageFile>, Vec<InputError>) {
    let mut images = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();

    for path in paths {
        match load_image(path).await {
            Ok(image) => images.push(image),
            Err(e) => {
                warn!("Skipping {}: {e}", path.display());
                skipped.push(e);
            }
        }
    }

    (images, skipped)
}

pub async fn read_text(arg: &TextArg) -> Result<String, InputError> {
    match arg {
        TextArg::Inline(text) => Ok(text.clone()),
        TextArg::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| InputError::Io {
                    path: path.display().to_string(),
                    source,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(image_content_type(Path::new("cv.PNG")), Some("image/png"));
        assert_eq!(image_content_type(Path::new("a/b/jd.jpeg")), Some("image/jpeg"));
        assert_eq!(image_content_type(Path::new("notes.txt")), None);
        assert_eq!(image_content_type(Path::new("no_extension")), None);
    }

    #[tokio::test]
    async fn test_load_image_reads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let image = load_image(&path).await.unwrap();
        assert_eq!(image.name, "resume.png");
        assert_eq!(image.content_type, "image/png");
        assert_eq!(&image.bytes[..], b"\x89PNG");
    }

    #[tokio::test]
    async fn test_load_images_skips_non_images_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let notes = dir.path().join("notes.txt");
        let b = dir.path().join("b.webp");
        std::fs::write(&a, b"a").unwrap();
        std::fs::write(&notes, b"not an image").unwrap();
        std::fs::write(&b, b"b").unwrap();
        let missing = dir.path().join("gone.png");

        let (images, skipped) = load_images(&[a, notes, missing, b]).await;
        let names: Vec<_> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a.jpg", "b.webp"]);
        assert_eq!(skipped.len(), 2);
        assert!(matches!(skipped[0], InputError::NotAnImage(_)));
        assert!(matches!(skipped[1], InputError::Io { .. }));
    }

    #[tokio::test]
    async fn test_read_text_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Jane Doe\nRust, Tokio").unwrap();

        let text = read_text(&TextArg::File(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe\nRust, Tokio");
        assert_eq!(
            read_text(&TextArg::Inline("inline".to_string())).await.unwrap(),
            "inline"
        );
    }
}
