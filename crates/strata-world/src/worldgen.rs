use std::fs;
use std::path::Path;

use serde::Deserialize;
use strata_blocks::{Block, BlockKind};
use thiserror::Error;

use crate::caves::CaveGenerator;
use crate::generator::{ChunkGenerator, FlatGenerator};

#[derive(Debug, Error)]
pub enum TerrainConfigError {
    #[error("reading terrain config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing terrain config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid terrain config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct TerrainConfig {
    #[serde(default = "default_mode")]
    pub mode: TerrainMode,
    #[serde(default = "default_sea_level")]
    pub sea_level: i32,
    #[serde(default)]
    pub flat: Flat,
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub surface: Surface,
    #[serde(default)]
    pub carvers: Carvers,
    #[serde(default)]
    pub water: Water,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            sea_level: default_sea_level(),
            flat: Flat::default(),
            height: Height::default(),
            surface: Surface::default(),
            carvers: Carvers::default(),
            water: Water::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TerrainMode {
    Caves,
    Flat,
}

fn default_mode() -> TerrainMode {
    TerrainMode::Caves
}
fn default_sea_level() -> i32 {
    0
}

/// Bottom-up list of solid layers for flat terrain.
#[derive(Clone, Debug, Deserialize)]
pub struct Flat {
    #[serde(default = "default_flat_layers")]
    pub layers: Vec<Layer>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Layer {
    pub block: Block,
    pub thickness: i32,
}

fn default_flat_layers() -> Vec<Layer> {
    vec![
        Layer {
            block: Block::new(BlockKind::Bedrock),
            thickness: 1,
        },
        Layer {
            block: Block::STONE,
            thickness: 12,
        },
        Layer {
            block: Block::new(BlockKind::Dirt),
            thickness: 3,
        },
        Layer {
            block: Block::new(BlockKind::GrassBlock),
            thickness: 1,
        },
    ]
}
impl Default for Flat {
    fn default() -> Self {
        Self {
            layers: default_flat_layers(),
        }
    }
}

/// Surface height field: `base + amplitude * noise(x, z)`.
#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    #[serde(default = "default_height_base")]
    pub base: i32,
    #[serde(default = "default_height_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_height_freq")]
    pub frequency: f32,
}
fn default_height_base() -> i32 {
    8
}
fn default_height_amplitude() -> f32 {
    6.0
}
fn default_height_freq() -> f32 {
    0.02
}
impl Default for Height {
    fn default() -> Self {
        Self {
            base: default_height_base(),
            amplitude: default_height_amplitude(),
            frequency: default_height_freq(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    #[serde(default = "default_top")]
    pub top: Block,
    /// Top block used for columns that end below sea level.
    #[serde(default = "default_shore")]
    pub shore: Block,
    #[serde(default = "default_subsoil")]
    pub subsoil: Block,
    #[serde(default = "default_topsoil")]
    pub topsoil_thickness: i32,
    #[serde(default = "default_stone")]
    pub stone: Block,
    #[serde(default = "default_deep")]
    pub deep: Block,
    /// Stone below this Y becomes `deep`.
    #[serde(default = "default_deep_below")]
    pub deep_below: i32,
}
fn default_top() -> Block {
    Block::new(BlockKind::GrassBlock)
}
fn default_shore() -> Block {
    Block::new(BlockKind::Sand)
}
fn default_subsoil() -> Block {
    Block::new(BlockKind::Dirt)
}
fn default_topsoil() -> i32 {
    3
}
fn default_stone() -> Block {
    Block::STONE
}
fn default_deep() -> Block {
    Block::new(BlockKind::Deepslate)
}
fn default_deep_below() -> i32 {
    -32
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            top: default_top(),
            shore: default_shore(),
            subsoil: default_subsoil(),
            topsoil_thickness: default_topsoil(),
            stone: default_stone(),
            deep: default_deep(),
            deep_below: default_deep_below(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Water {
    #[serde(default = "default_water_enable")]
    pub enable: bool,
}
fn default_water_enable() -> bool {
    true
}
impl Default for Water {
    fn default() -> Self {
        Self {
            enable: default_water_enable(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Carvers {
    #[serde(default = "default_carvers_enable")]
    pub enable: bool,
    #[serde(default = "default_y_scale")]
    pub y_scale: f32,
    #[serde(default = "default_eps_base")]
    pub eps_base: f32,
    #[serde(default = "default_eps_add")]
    pub eps_add: f32,
    #[serde(default = "default_warp_xy")]
    pub warp_xy: f32,
    #[serde(default = "default_warp_y")]
    pub warp_y: f32,
    #[serde(default = "default_soil_min")]
    pub soil_min: f32,
    /// Cells this far above the floor are never carved.
    #[serde(default = "default_floor_margin")]
    pub floor_margin: i32,
    /// Carved cells at or below this Y fill with lava.
    #[serde(default)]
    pub lava_level: Option<i32>,
    #[serde(default = "default_tunnel")]
    pub tunnel: Fractal,
    #[serde(default = "default_warp")]
    pub warp: Fractal,
}
#[derive(Clone, Debug, Deserialize)]
pub struct Fractal {
    #[serde(default = "d_oct")]
    pub octaves: i32,
    #[serde(default = "d_pers")]
    pub persistence: f32,
    #[serde(default = "d_lac")]
    pub lacunarity: f32,
    #[serde(default = "d_scale")]
    pub scale: f32,
}
fn d_oct() -> i32 {
    3
}
fn d_pers() -> f32 {
    0.55
}
fn d_lac() -> f32 {
    2.0
}
fn d_scale() -> f32 {
    40.0
}
fn default_carvers_enable() -> bool {
    true
}
fn default_y_scale() -> f32 {
    1.6
}
fn default_eps_base() -> f32 {
    0.06
}
fn default_eps_add() -> f32 {
    0.10
}
fn default_warp_xy() -> f32 {
    5.0
}
fn default_warp_y() -> f32 {
    2.5
}
fn default_soil_min() -> f32 {
    3.5
}
fn default_floor_margin() -> i32 {
    2
}
fn default_tunnel() -> Fractal {
    Fractal {
        octaves: 3,
        persistence: 0.55,
        lacunarity: 2.0,
        scale: 40.0,
    }
}
fn default_warp() -> Fractal {
    Fractal {
        octaves: 2,
        persistence: 0.6,
        lacunarity: 2.0,
        scale: 60.0,
    }
}
impl Default for Fractal {
    fn default() -> Self {
        Self {
            octaves: d_oct(),
            persistence: d_pers(),
            lacunarity: d_lac(),
            scale: d_scale(),
        }
    }
}
impl Default for Carvers {
    fn default() -> Self {
        Self {
            enable: default_carvers_enable(),
            y_scale: default_y_scale(),
            eps_base: default_eps_base(),
            eps_add: default_eps_add(),
            warp_xy: default_warp_xy(),
            warp_y: default_warp_y(),
            soil_min: default_soil_min(),
            floor_margin: default_floor_margin(),
            lava_level: None,
            tunnel: default_tunnel(),
            warp: default_warp(),
        }
    }
}

#[derive(Deserialize)]
struct TerrainFile {
    #[serde(default)]
    terrain: TerrainConfig,
}

impl TerrainConfig {
    /// Parses a document holding a `[terrain]` table; a missing table yields defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, TerrainConfigError> {
        let file: TerrainFile = toml::from_str(s)?;
        file.terrain.validate()?;
        Ok(file.terrain)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, TerrainConfigError> {
        let s = fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&s)?;
        log::info!(target: "terrain", "loaded terrain config from {} (mode {:?})", path.display(), cfg.mode);
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), TerrainConfigError> {
        if let Some(layer) = self.flat.layers.iter().find(|l| l.thickness < 0) {
            return Err(TerrainConfigError::Invalid(format!(
                "flat layer {} has negative thickness {}",
                layer.block, layer.thickness
            )));
        }
        if self.height.amplitude < 0.0 {
            return Err(TerrainConfigError::Invalid(
                "height.amplitude must not be negative".into(),
            ));
        }
        if self.surface.topsoil_thickness < 1 {
            return Err(TerrainConfigError::Invalid(
                "surface.topsoil_thickness must be at least 1".into(),
            ));
        }
        for (name, f) in [("tunnel", &self.carvers.tunnel), ("warp", &self.carvers.warp)] {
            if f.octaves < 1 || f.scale <= 0.0 {
                return Err(TerrainConfigError::Invalid(format!(
                    "carvers.{name} needs octaves >= 1 and a positive scale"
                )));
            }
        }
        Ok(())
    }

    pub fn build_generator(&self, seed: u64) -> Box<dyn ChunkGenerator> {
        match self.mode {
            TerrainMode::Flat => Box::new(FlatGenerator::from_config(self)),
            TerrainMode::Caves => Box::new(CaveGenerator::new(self.clone(), seed)),
        }
    }
}
