use std::path::PathBuf;

use crate::surface::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Settings shared by every render served from one cache
#[derive(Debug, Clone, PartialEq)]
pub struct TextureConfig {
    /// Surface width in pixels; rings share this width
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Directory holding rendered textures
    pub textures_dir: PathBuf,
    /// Public prefix prepended to file names in returned references
    pub url_prefix: String,
    /// JPEG quality for surface textures (1-100)
    pub jpeg_quality: u8,
}

impl Default for TextureConfig {
    fn default() -> Self {
        TextureConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            textures_dir: PathBuf::from("static/textures"),
            url_prefix: "/textures".to_string(),
            jpeg_quality: 90,
        }
    }
}

impl TextureConfig {
    /// Public reference for a stored file
    pub fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), file_name)
    }
}
