//! Contents.json data model for Apple's Asset Catalog format.
//!
//! Mirrors the subset of the asset catalog schema our iOS and macOS writers
//! emit: per-image filename, idiom, scale, size and role, plus the catalog
//! info block.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Root structure of a Contents.json file.
#[derive(Serialize, Debug, Clone)]
pub struct ContentsFile {
    /// Image entries for the different scales, sizes and device types.
    pub images: Vec<ImageEntry>,

    /// Versioning and authorship information.
    pub info: Info,
}

/// One image entry within the asset catalog.
#[derive(Serialize, Debug, Clone)]
pub struct ImageEntry {
    /// The image filename (.png).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// The device type, e.g. "iphone", "ipad", "mac", "ios-marketing".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idiom: Option<String>,

    /// The scale factor: "1x", "2x" or "3x".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,

    /// The size in points, e.g. "29x29" or "83.5x83.5".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Expected pixel size for app icons, used by validators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_size: Option<String>,

    /// Icon role, e.g. "appLauncher" or "notificationCenter".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Target folder, used by the macOS catalog to point at sibling files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

/// Versioning and authorship information for the asset catalog.
#[derive(Serialize, Debug, Clone)]
pub struct Info {
    /// The format version of the asset catalog (always 1).
    pub version: u8,

    /// The tool that authored the catalog.
    pub author: String,
}

impl ContentsFile {
    pub fn new(author: String) -> Self {
        Self {
            images: Vec::new(),
            info: Info { version: 1, author },
        }
    }

    pub fn add_image(&mut self, image: ImageEntry) {
        self.images.push(image);
    }
}

impl ImageEntry {
    /// An entry with only filename, idiom and scale set.
    pub fn new(filename: String, idiom: String, scale: String) -> Self {
        Self {
            filename: Some(filename),
            idiom: Some(idiom),
            scale: Some(scale),
            size: None,
            expected_size: None,
            role: None,
            folder: None,
        }
    }

    /// An app-icon entry carrying its point size and role.
    pub fn new_app_icon(
        filename: String,
        idiom: String,
        size: String,
        scale: String,
        role: Option<String>,
    ) -> Self {
        Self {
            filename: Some(filename),
            idiom: Some(idiom),
            scale: Some(scale),
            size: Some(size.clone()),
            expected_size: Some(size),
            role,
            folder: None,
        }
    }

    pub fn with_folder(mut self, folder: String) -> Self {
        self.folder = Some(folder);
        self
    }
}

/// Write a Contents.json file into `dir` with the given image entries.
pub fn write_contents_json(dir: &Path, images: Vec<ImageEntry>) -> Result<()> {
    let mut contents = ContentsFile::new("icon-synth".to_string());
    for image in images {
        contents.add_image(image);
    }
    let json = serde_json::to_string_pretty(&contents).context("Failed to serialize Contents.json")?;
    std::fs::write(dir.join("Contents.json"), json).context("Failed to write Contents.json")
}
