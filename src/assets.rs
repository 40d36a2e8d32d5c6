//! Asset lookups with procedural fallbacks
//!
//! Every lookup tolerates a missing asset: images and music are optional,
//! fonts fall back to the `text` style and colours fall back to white. The
//! core never fails because something is missing on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::sim::color::{Palette, Rgb, WHITE};

/// A loaded image, addressed by file stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub name: String,
    pub path: PathBuf,
}

/// A font style and its point size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub style: String,
    pub size: u32,
}

/// The asset collaborator used by rendering and session setup
pub trait Assets {
    fn get_image(&self, name: &str) -> Option<&Image>;
    /// Unknown styles resolve to the `text` font
    fn get_font(&self, style: &str) -> Font;
    /// Unknown names resolve to white
    fn get_color(&self, name: &str) -> Rgb;
    fn get_music(&self, name: &str) -> Option<&Path>;

    /// Colours the simulation uses for its own particle effects
    fn palette(&self) -> Palette {
        Palette {
            jump_dust: self.get_color("wood_light"),
            landing_dust: self.get_color("wood_accent"),
            ..Palette::default()
        }
    }
}

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "bmp"];
const MUSIC_EXTENSIONS: [&str; 2] = ["mp3", "wav"];

/// In-memory asset table, optionally populated from an assets directory
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    colors: HashMap<String, Rgb>,
    fonts: HashMap<String, Font>,
    images: HashMap<String, Image>,
    music: HashMap<String, PathBuf>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCatalog {
    /// Built-in colours and font styles, no images or music
    pub fn new() -> Self {
        let colors = [
            ("wood_light", Rgb(210, 180, 140)),
            ("wood_dark", Rgb(139, 69, 19)),
            ("wood_accent", Rgb(160, 82, 45)),
            ("text_light", Rgb(255, 255, 255)),
            ("text_dark", Rgb(50, 50, 50)),
            ("magic_blue", Rgb(100, 149, 237)),
            ("magic_purple", Rgb(147, 112, 219)),
            ("magic_gold", Rgb(255, 215, 0)),
            ("background", Rgb(20, 12, 28)),
            ("background_light", Rgb(35, 25, 45)),
            ("stars", Rgb(255, 255, 220)),
        ]
        .into_iter()
        .map(|(name, color)| (name.to_string(), color))
        .collect();

        let fonts = [("title", 64), ("subtitle", 48), ("button", 36), ("text", 24)]
            .into_iter()
            .map(|(style, size)| {
                (
                    style.to_string(),
                    Font {
                        style: style.to_string(),
                        size,
                    },
                )
            })
            .collect();

        Self {
            colors,
            fonts,
            images: HashMap::new(),
            music: HashMap::new(),
        }
    }

    /// Built-ins plus whatever `root/images` and `root/music` contain
    ///
    /// `root/colors.json` may override named colours with `[r, g, b]`
    /// arrays. Missing or unreadable directories are logged and skipped.
    pub fn scan(root: &Path) -> Self {
        let mut catalog = Self::new();
        catalog.load_color_overrides(&root.join("colors.json"));
        for (stem, path) in list_files(&root.join("images"), &IMAGE_EXTENSIONS) {
            catalog.insert_image(&stem, path);
        }
        for (stem, path) in list_files(&root.join("music"), &MUSIC_EXTENSIONS) {
            catalog.music.insert(stem, path);
        }
        log::info!(
            "Assets: {} image(s), {} music track(s) from {}",
            catalog.images.len(),
            catalog.music.len(),
            root.display()
        );
        catalog
    }

    pub fn insert_image(&mut self, name: &str, path: PathBuf) {
        self.images.insert(
            name.to_string(),
            Image {
                name: name.to_string(),
                path,
            },
        );
    }

    pub fn set_color(&mut self, name: &str, color: Rgb) {
        self.colors.insert(name.to_string(), color);
    }

    fn load_color_overrides(&mut self, path: &Path) {
        let Ok(json) = std::fs::read_to_string(path) else {
            return;
        };
        match serde_json::from_str::<HashMap<String, Vec<i64>>>(&json) {
            Ok(overrides) => {
                for (name, channels) in overrides {
                    self.set_color(&name, Rgb::from_channels(&channels));
                }
            }
            Err(e) => log::warn!("Ignoring colour overrides in {}: {}", path.display(), e),
        }
    }
}

impl Assets for AssetCatalog {
    fn get_image(&self, name: &str) -> Option<&Image> {
        self.images.get(name)
    }

    fn get_font(&self, style: &str) -> Font {
        self.fonts
            .get(style)
            .or_else(|| self.fonts.get("text"))
            .cloned()
            .unwrap_or(Font {
                style: "text".to_string(),
                size: 24,
            })
    }

    fn get_color(&self, name: &str) -> Rgb {
        match self.colors.get(name) {
            Some(color) => *color,
            None => {
                log::warn!("Unknown colour '{name}', using white");
                WHITE
            }
        }
    }

    fn get_music(&self, name: &str) -> Option<&Path> {
        self.music.get(name).map(PathBuf::as_path)
    }
}

/// `(stem, path)` of every file in `dir` with one of `extensions`, sorted
fn list_files(dir: &Path, extensions: &[&str]) -> Vec<(String, PathBuf)> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<(String, PathBuf)> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?.to_string();
            Some((stem, path))
        })
        .collect();
    files.sort();
    files
}
