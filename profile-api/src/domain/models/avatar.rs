use std::fmt;

use image::ImageFormat;
use serde::Deserialize;

/// Blob-store directory that holds every processed avatar.
pub const AVATAR_DIRECTORY: &str = "avatars";

pub const DEFAULT_AVATAR_WIDTH: u32 = 150;
pub const DEFAULT_AVATAR_HEIGHT: u32 = 150;
pub const DEFAULT_AVATAR_QUALITY: u8 = 90;

/// Target geometry and JPEG quality for processed avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AvatarSettings {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_AVATAR_WIDTH,
            height: DEFAULT_AVATAR_HEIGHT,
            quality: DEFAULT_AVATAR_QUALITY,
        }
    }
}

/// A raw uploaded avatar file, exactly as received.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl AvatarUpload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: None,
            file_name: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for AvatarUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarUpload")
            .field("bytes", &format_args!("[{} bytes]", self.bytes.len()))
            .field("content_type", &self.content_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// Image types accepted as avatar uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Svg,
}

impl ImageKind {
    /// Extensions accepted by the upload rules, in the order they are reported.
    pub const ACCEPTED_EXTENSIONS: &'static [&'static str] = &["jpeg", "png", "jpg", "gif", "svg"];

    /// Detects the image type from the file contents, ignoring any declared
    /// content type. Returns `None` for non-images and for image formats that
    /// are not accepted.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes) {
            Ok(ImageFormat::Jpeg) => Some(Self::Jpeg),
            Ok(ImageFormat::Png) => Some(Self::Png),
            Ok(ImageFormat::Gif) => Some(Self::Gif),
            Ok(_) => None,
            Err(_) => looks_like_svg(bytes).then_some(Self::Svg),
        }
    }

    /// Whether the contents look like any image at all, accepted or not.
    pub fn is_image(bytes: &[u8]) -> bool {
        image::guess_format(bytes).is_ok() || looks_like_svg(bytes)
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();

    text.starts_with('<') && text.contains("<svg")
}

/// A processed avatar as persisted in the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarAsset {
    pub storage_path: String,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

/// Blob-store key for an avatar file name.
pub fn avatar_storage_key(file_name: &str) -> String {
    format!("{AVATAR_DIRECTORY}/{file_name}")
}
