//! Image attachments that travel with the next user submission.

use std::{io::Cursor, path::Path};

use anyhow::Context;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat};

use crate::base::types::Res;

/// A raster image attached to the next user turn.
///
/// The raw bytes are kept as uploaded. Decoding only happens when the image
/// is re-encoded for the LLM, so a bad file surfaces as a failure of that turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    name: String,
    bytes: Vec<u8>,
}

impl Attachment {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    /// Read an attachment from disk.
    pub async fn from_path(path: &Path) -> Res<Self> {
        let bytes = tokio::fs::read(path).await.with_context(|| format!("Failed to read image `{}`", path.display()))?;
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| path.display().to_string());

        Ok(Self::from_bytes(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the image and re-encode it as JPEG.
    pub fn to_jpeg(&self) -> Res<Vec<u8>> {
        let image = image::load_from_memory(&self.bytes).with_context(|| format!("Failed to decode image `{}`", self.name))?;

        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());

        let mut jpeg = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .with_context(|| format!("Failed to encode image `{}` as JPEG", self.name))?;

        Ok(jpeg)
    }

    /// The image as an inline `data:image/jpeg;base64,...` URL.
    pub fn to_jpeg_data_url(&self) -> Res<String> {
        let jpeg = self.to_jpeg()?;
        Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
    }
}

// Tests.

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small opaque PNG for tests.
    pub(crate) fn png_bytes() -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 30, 30, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_png_is_reencoded_as_jpeg() {
        let attachment = Attachment::from_bytes("rash.png", png_bytes());

        let jpeg = attachment.to_jpeg().unwrap();

        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_data_url_is_base64_jpeg() {
        let attachment = Attachment::from_bytes("rash.png", png_bytes());

        let url = attachment.to_jpeg_data_url().unwrap();
        let payload = url.strip_prefix("data:image/jpeg;base64,").unwrap();
        let decoded = STANDARD.decode(payload).unwrap();

        assert_eq!(image::guess_format(&decoded).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_undecodable_image_is_an_error() {
        let attachment = Attachment::from_bytes("notes.txt", b"definitely not an image".to_vec());

        let err = attachment.to_jpeg().unwrap_err();

        assert!(err.to_string().contains("notes.txt"));
    }

    #[tokio::test]
    async fn test_from_path_reads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wound.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();

        assert_eq!(attachment.name(), "wound.png");
        assert_eq!(attachment.bytes(), png_bytes().as_slice());
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let result = Attachment::from_path(Path::new("/definitely/not/here.jpg")).await;
        assert!(result.is_err());
    }
}
