//! Saving generated designs to disk.

use crate::{
    error::{Result, StudioError},
    models::GeneratedDesign,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Decoded `data:` URI.
#[derive(Debug, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub fn decode_data_uri(uri: &str) -> Result<InlineImage> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| StudioError::ExportError("not a data URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| StudioError::ExportError("data URI has no payload".into()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| StudioError::ExportError("only base64 data URIs are supported".into()))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| StudioError::ExportError(format!("invalid base64 payload: {}", e)))?;

    Ok(InlineImage {
        mime_type: mime_type.to_string(),
        bytes,
    })
}

pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

/// `<category>_<id>.<ext>`, with the category lowercased.
pub fn file_name(design: &GeneratedDesign, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        design.category.as_str().to_lowercase().replace(' ', "_"),
        design.id,
        extension
    )
}

#[derive(Clone, Default)]
pub struct DesignExporter {
    client: Client,
}

impl DesignExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the design into `dir` and returns the file path. Remote
    /// locators are downloaded first.
    pub async fn save(&self, design: &GeneratedDesign, dir: &Path) -> Result<PathBuf> {
        let (bytes, extension) = if design.is_inline() {
            let image = decode_data_uri(&design.image_locator)?;
            (image.bytes, extension_for(&image.mime_type))
        } else {
            self.download(&design.image_locator).await?
        };

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| StudioError::ExportError(format!("{}: {}", dir.display(), e)))?;

        let path = dir.join(file_name(design, extension));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StudioError::ExportError(format!("{}: {}", path.display(), e)))?;

        log::info!("💾 Saved {} to {}", design.category, path.display());
        Ok(path)
    }

    pub async fn save_all(&self, designs: &[GeneratedDesign], dir: &Path) -> Vec<Result<PathBuf>> {
        futures::future::join_all(designs.iter().map(|design| self.save(design, dir))).await
    }

    async fn download(&self, url: &str) -> Result<(Vec<u8>, &'static str)> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StudioError::ExportError(format!(
                "download of {} failed with {}",
                url, status
            )));
        }

        let extension = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| extension_for(value.split(';').next().unwrap_or("").trim()))
            .unwrap_or("png");
        let bytes = response.bytes().await?;
        Ok((bytes.to_vec(), extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectRatio, DesignCategory};

    fn inline_design(locator: &str) -> GeneratedDesign {
        GeneratedDesign {
            id: "1700000000000-4".into(),
            category: DesignCategory::Cover,
            aspect_ratio: AspectRatio::Landscape,
            image_locator: locator.into(),
            resolved_prompt: "For a brand about \"x\", create a Cover: y".into(),
        }
    }

    #[test]
    fn test_decode_data_uri() {
        let image = decode_data_uri("data:image/jpeg;base64,QUJD").unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.bytes, b"ABC".to_vec());
    }

    #[test]
    fn test_decode_rejects_malformed_uris() {
        assert!(decode_data_uri("https://example.com/a.png").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:image/png,plain").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_file_name() {
        let design = inline_design("data:image/png;base64,QUJD");
        assert_eq!(file_name(&design, "png"), "cover_1700000000000-4.png");
    }

    #[tokio::test]
    async fn test_save_inline_design() {
        let dir = tempfile::tempdir().unwrap();
        let design = inline_design("data:image/webp;base64,QUJD");

        let path = DesignExporter::new().save(&design, dir.path()).await.unwrap();

        assert_eq!(path.file_name().unwrap(), "cover_1700000000000-4.webp");
        assert_eq!(std::fs::read(&path).unwrap(), b"ABC".to_vec());
    }
}
