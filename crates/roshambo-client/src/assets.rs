use std::io;
use std::path::{Path, PathBuf};

use roshambo_engine::canvas::Image;
use roshambo_game::ScreenError;
use roshambo_game::gesture::Gesture;
use roshambo_game::hands::{self, HandSprites};
use roshambo_game::match_engine::Player;

/// Fonts tried after the configured one and the bundled `fonts/` directory.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Vertex and fragment source of one background.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

/// Read-only view of the asset directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
    font: Option<PathBuf>,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>, font: Option<PathBuf>) -> Self {
        Self { root: root.into(), font }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads `shaders/<name>.vert.wgsl` and `shaders/<name>.frag.wgsl`.
    pub fn shader_sources(&self, name: &str) -> Result<ShaderSources, ScreenError> {
        let dir = self.root.join("shaders");
        Ok(ShaderSources {
            vertex: read_text(&dir.join(format!("{name}.vert.wgsl")))?,
            fragment: read_text(&dir.join(format!("{name}.frag.wgsl")))?,
        })
    }

    /// Decodes every hand image under `images/` that exists. A missing or
    /// undecodable file leaves that hand on its fallback panel.
    pub fn load_hand_sprites(&self) -> HandSprites {
        let dir = self.root.join("images");
        let mut sprites = HandSprites::default();
        for player in [Player::First, Player::Second] {
            for gesture in Gesture::ALL {
                let path = dir.join(hands::file_name(player, gesture));
                match decode_rgba(&path) {
                    Ok(image) => sprites.set(player, gesture, image),
                    Err(image::ImageError::IoError(err)) if err.kind() == io::ErrorKind::NotFound => {
                        log::debug!("hand image {} not found", path.display());
                    }
                    Err(err) => log::warn!("failed to load hand image {}: {err}", path.display()),
                }
            }
        }
        log::info!("{} of 6 hand images loaded", sprites.loaded());
        sprites
    }

    /// Returns the first readable font and where it came from.
    pub fn load_font(&self) -> Result<(PathBuf, Vec<u8>), ScreenError> {
        let mut last_err = None;
        for path in self.font_candidates() {
            match std::fs::read(&path) {
                Ok(bytes) => {
                    log::info!("using font {}", path.display());
                    return Ok((path, bytes));
                }
                Err(err) => {
                    log::debug!("font {} unavailable: {err}", path.display());
                    last_err = Some((path, err));
                }
            }
        }

        let (path, source) = last_err.unwrap_or_else(|| {
            (self.root.join("fonts"), io::Error::new(io::ErrorKind::NotFound, "no font candidates"))
        });
        Err(ScreenError::MissingAsset { path, source })
    }

    /// Configured font, then `<root>/fonts/*.ttf` in name order, then system fonts.
    fn font_candidates(&self) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = self.font.iter().cloned().collect();

        if let Ok(entries) = std::fs::read_dir(self.root.join("fonts")) {
            let mut bundled: Vec<PathBuf> = entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("ttf")))
                .collect();
            bundled.sort();
            out.extend(bundled);
        }

        out.extend(SYSTEM_FONTS.iter().map(PathBuf::from));
        out
    }
}

fn decode_rgba(path: &Path) -> Result<Image, image::ImageError> {
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Image::from_rgba8(width, height, rgba.into_raw()).ok_or_else(|| {
        image::ImageError::Limits(image::error::LimitError::from_kind(
            image::error::LimitErrorKind::DimensionError,
        ))
    })
}

fn read_text(path: &Path) -> Result<String, ScreenError> {
    std::fs::read_to_string(path).map_err(|source| ScreenError::MissingAsset {
        path: path.to_path_buf(),
        source,
    })
}
