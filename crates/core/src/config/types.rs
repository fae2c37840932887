use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scheduler::SchedulerConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub album: AlbumConfig,
    pub listing: ListingConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Which album to mirror and how to authenticate against the remote service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumConfig {
    /// Album owner id. Also used as the destination directory name.
    pub user_id: String,
    /// Opaque credential attached to every listing request.
    pub credential: String,
}

/// Remote listing service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingConfig {
    /// Base URL of the listing service (e.g., "http://photos.example.com")
    pub endpoint: String,
    /// Image variant to download (default: original)
    #[serde(default)]
    pub quality: ImageQuality,
}

/// Image variant requested from the file endpoint.
///
/// The remote serves each photo under fixed path segments per variant. Asking
/// for a variant larger than the source's native resolution yields the
/// original; that substitution happens server-side.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImageQuality {
    /// 150 x 150 thumbnail
    ThumbSmall,
    /// 300 x 300 thumbnail
    ThumbMedium,
    /// 690px-wide rendition
    MediumWidth,
    /// 1024px-wide rendition
    LargeWidth,
    /// Full-size original
    #[default]
    Original,
}

impl ImageQuality {
    /// URL path segment the file endpoint serves this variant under.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ImageQuality::ThumbSmall => "thumb150",
            ImageQuality::ThumbMedium => "thumb300",
            ImageQuality::MediumWidth => "mw690",
            ImageQuality::LargeWidth => "mw1024",
            ImageQuality::Original => "large",
        }
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory under which per-album subdirectories are created.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("images")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_default_is_original() {
        assert_eq!(ImageQuality::default(), ImageQuality::Original);
    }

    #[test]
    fn test_quality_path_segments() {
        assert_eq!(ImageQuality::ThumbSmall.path_segment(), "thumb150");
        assert_eq!(ImageQuality::ThumbMedium.path_segment(), "thumb300");
        assert_eq!(ImageQuality::MediumWidth.path_segment(), "mw690");
        assert_eq!(ImageQuality::LargeWidth.path_segment(), "mw1024");
        assert_eq!(ImageQuality::Original.path_segment(), "large");
    }

    #[test]
    fn test_quality_deserialize_snake_case() {
        let q: ImageQuality = serde_json::from_str("\"medium_width\"").unwrap();
        assert_eq!(q, ImageQuality::MediumWidth);
    }

    #[test]
    fn test_storage_config_default() {
        let storage = StorageConfig::default();
        assert_eq!(storage.root_dir, PathBuf::from("images"));
    }
}
