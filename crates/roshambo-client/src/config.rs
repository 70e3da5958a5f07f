//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Missing files and missing keys fall back to defaults; a malformed file is
//! reported and ignored.

use std::path::{Path, PathBuf};
use std::time::Duration;

use roshambo_engine::coords::AspectLock;
use roshambo_engine::render::{UniformError, UniformValue};
use roshambo_engine::window::RuntimeConfig;
use roshambo_game::GameSettings;
use roshambo_game::match_engine::MatchTimings;
use serde::Deserialize;
use winit::dpi::PhysicalSize;

const FILE_NAME: &str = "config.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub window: WindowConfig,
    pub timings: MatchTimings,
    pub assets_dir: PathBuf,
    /// Explicit font file; searched before the bundled and system fonts.
    pub font: Option<PathBuf>,
    pub log_filter: Option<String>,
    pub menu_uniforms: Vec<(String, UniformValue)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
}

/// Result of [`ClientConfig::load`]. Problems are returned rather than logged
/// because logging is configured from this file.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: ClientConfig,
    pub path: Option<PathBuf>,
    pub warnings: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    window: TomlWindow,
    #[serde(default, rename = "match")]
    round: TomlMatch,
    #[serde(default)]
    assets: TomlAssets,
    #[serde(default)]
    logging: TomlLogging,
    #[serde(default)]
    background: TomlBackground,
}

#[derive(Deserialize, Debug)]
struct TomlWindow {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    min_width: Option<u32>,
    min_height: Option<u32>,
    #[serde(default = "default_max_width")]
    max_width: u32,
    #[serde(default = "default_max_height")]
    max_height: u32,
}

#[derive(Deserialize, Debug)]
struct TomlMatch {
    #[serde(default = "default_tie_reset")]
    tie_reset_secs: f64,
    #[serde(default = "default_approach")]
    approach_secs: f64,
    #[serde(default = "default_oscillate")]
    oscillate_secs: f64,
    #[serde(default = "default_oscillate_cycles")]
    oscillate_cycles: u32,
    #[serde(default = "default_reveal")]
    reveal_secs: f64,
}

#[derive(Deserialize, Debug)]
struct TomlAssets {
    #[serde(default = "default_assets_dir")]
    dir: String,
    font: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlLogging {
    filter: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlBackground {
    #[serde(default)]
    uniforms: toml::Table,
}

// ── Defaults ──

fn default_title() -> String { "Rock Paper Scissors".into() }
fn default_width() -> u32 { 640 }
fn default_height() -> u32 { 360 }
fn default_max_width() -> u32 { 3840 }
fn default_max_height() -> u32 { 2160 }
fn default_tie_reset() -> f64 { 5.0 }
fn default_approach() -> f64 { 0.6 }
fn default_oscillate() -> f64 { 1.5 }
fn default_oscillate_cycles() -> u32 { 3 }
fn default_reveal() -> f64 { 0.5 }
fn default_assets_dir() -> String { "assets".into() }

impl Default for TomlWindow {
    fn default() -> Self {
        TomlWindow {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            min_width: None,
            min_height: None,
            max_width: default_max_width(),
            max_height: default_max_height(),
        }
    }
}

impl Default for TomlMatch {
    fn default() -> Self {
        TomlMatch {
            tie_reset_secs: default_tie_reset(),
            approach_secs: default_approach(),
            oscillate_secs: default_oscillate(),
            oscillate_cycles: default_oscillate_cycles(),
            reveal_secs: default_reveal(),
        }
    }
}

impl Default for TomlAssets {
    fn default() -> Self {
        TomlAssets {
            dir: default_assets_dir(),
            font: None,
        }
    }
}

// ── Conversion ──

/// Converts one TOML value into a uniform value.
///
/// Booleans, integers, floats and non-empty arrays of numbers are accepted.
/// An array holding any float becomes a float vector.
pub fn uniform_from_toml(value: &toml::Value) -> Result<UniformValue, UniformError> {
    match value {
        toml::Value::Boolean(b) => Ok(UniformValue::Bool(*b)),
        toml::Value::Integer(i) => int32(*i).map(UniformValue::Int),
        toml::Value::Float(f) => Ok(UniformValue::Float(*f as f32)),
        toml::Value::Array(items) if !items.is_empty() => {
            if items.iter().all(|v| matches!(v, toml::Value::Integer(_))) {
                let ints = items
                    .iter()
                    .map(|v| match v {
                        toml::Value::Integer(i) => int32(*i),
                        other => Err(unsupported(other)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(UniformValue::IntVec(ints));
            }
            let floats = items
                .iter()
                .map(|v| match v {
                    toml::Value::Integer(i) => Ok(*i as f32),
                    toml::Value::Float(f) => Ok(*f as f32),
                    other => Err(unsupported(other)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(UniformValue::FloatVec(floats))
        }
        other => Err(unsupported(other)),
    }
}

fn int32(i: i64) -> Result<i32, UniformError> {
    i32::try_from(i).map_err(|_| UniformError::UnsupportedType {
        found: format!("integer {i} outside the i32 range"),
    })
}

fn unsupported(value: &toml::Value) -> UniformError {
    let found = match value {
        toml::Value::Array(items) if items.is_empty() => "empty array".to_owned(),
        toml::Value::Array(_) => "array with non-numeric items".to_owned(),
        other => other.type_str().to_owned(),
    };
    UniformError::UnsupportedType { found }
}

fn secs(value: f64, fallback: f64, key: &str, warnings: &mut Vec<String>) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_else(|_| {
        warnings.push(format!("match.{key} = {value} is not a valid duration, using {fallback}"));
        Duration::from_secs_f64(fallback)
    })
}

// ── Loading ──

impl ClientConfig {
    /// Loads `config.toml`.
    ///
    /// Search order: (1) exe directory, (2) current working directory.
    pub fn load() -> LoadedConfig {
        let dirs = candidate_dirs();

        let Some(path) = dirs.iter().map(|d| d.join(FILE_NAME)).find(|p| p.is_file()) else {
            let mut config = ClientConfig::default();
            config.assets_dir = resolve_dir(&config.assets_dir, &dirs);
            return LoadedConfig {
                config,
                path: None,
                warnings: Vec::new(),
            };
        };

        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| ClientConfig::parse(&text).map_err(|e| e.to_string()));

        let (mut config, warnings) = match parsed {
            Ok(ok) => ok,
            Err(err) => (
                ClientConfig::default(),
                vec![format!("{} is malformed, using defaults: {err}", path.display())],
            ),
        };

        config.assets_dir = resolve_dir(&config.assets_dir, &dirs);
        LoadedConfig {
            config,
            path: Some(path),
            warnings,
        }
    }

    /// Parses a configuration document.
    ///
    /// Syntax and type errors fail the whole document. Bad individual values
    /// fall back to their defaults and are reported as warnings.
    pub fn parse(text: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let raw: TomlConfig = toml::from_str(text)?;
        Ok(ClientConfig::from_raw(raw))
    }

    fn from_raw(raw: TomlConfig) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let w = raw.window;
        let window = WindowConfig {
            title: w.title,
            width: w.width.max(1),
            height: w.height.max(1),
            min_width: w.min_width.unwrap_or(w.width).max(1),
            min_height: w.min_height.unwrap_or(w.height).max(1),
            max_width: w.max_width,
            max_height: w.max_height,
        };

        let m = raw.round;
        let timings = MatchTimings {
            approach: secs(m.approach_secs, default_approach(), "approach_secs", &mut warnings),
            oscillate: secs(m.oscillate_secs, default_oscillate(), "oscillate_secs", &mut warnings),
            oscillate_cycles: m.oscillate_cycles,
            reveal: secs(m.reveal_secs, default_reveal(), "reveal_secs", &mut warnings),
            tie_reset: secs(m.tie_reset_secs, default_tie_reset(), "tie_reset_secs", &mut warnings),
        };

        let mut menu_uniforms = Vec::new();
        for (name, value) in &raw.background.uniforms {
            match uniform_from_toml(value) {
                Ok(v) => menu_uniforms.push((name.clone(), v)),
                Err(err) => warnings.push(format!("background.uniforms.{name}: {err}")),
            }
        }

        let config = ClientConfig {
            window,
            timings,
            assets_dir: PathBuf::from(raw.assets.dir),
            font: raw.assets.font.map(PathBuf::from),
            log_filter: raw.logging.filter,
            menu_uniforms,
        };
        (config, warnings)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        let w = &self.window;
        let lock = AspectLock::from_base(w.width, w.height, w.max_width, w.max_height);
        RuntimeConfig {
            title: w.title.clone(),
            initial_size: PhysicalSize::new(w.width, w.height),
            aspect_lock: Some(AspectLock {
                min_w: w.min_width,
                min_h: w.min_height,
                ..lock
            }),
        }
    }

    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            base_width: self.window.width,
            base_height: self.window.height,
            timings: self.timings,
            menu_uniforms: self.menu_uniforms.clone(),
            hands: Default::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::from_raw(TomlConfig::default()).0
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(dir);
    }
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.contains(&cwd) {
            dirs.push(cwd);
        }
    }
    dirs
}

/// First existing `<dir>/<path>` among `dirs`; `path` as given otherwise.
fn resolve_dir(path: &Path, dirs: &[PathBuf]) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    dirs.iter()
        .map(|d| d.join(path))
        .find(|p| p.is_dir())
        .unwrap_or_else(|| path.to_path_buf())
}
