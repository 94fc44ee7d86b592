use fastnoise_lite::{FastNoiseLite, NoiseType};
use strata_blocks::{Block, BlockKind};
use strata_geom::BlockPos;

use crate::generator::ChunkGenerator;
use crate::grid::VoxelGrid;
use crate::worldgen::{Fractal, TerrainConfig};

/// Noise height field with domain-warped tunnel carving below it.
pub struct CaveGenerator {
    cfg: TerrainConfig,
    terrain: FastNoiseLite,
    warp: FastNoiseLite,
    tunnel: FastNoiseLite,
}

impl CaveGenerator {
    pub fn new(cfg: TerrainConfig, seed: u64) -> Self {
        let seed = (seed ^ (seed >> 32)) as i32;
        let mut terrain = FastNoiseLite::with_seed(seed);
        terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
        terrain.set_frequency(Some(cfg.height.frequency));
        let mut warp = FastNoiseLite::with_seed(seed ^ 99_173);
        warp.set_noise_type(Some(NoiseType::OpenSimplex2));
        warp.set_frequency(Some(1.0));
        let mut tunnel = FastNoiseLite::with_seed(seed ^ 41_337);
        tunnel.set_noise_type(Some(NoiseType::OpenSimplex2));
        tunnel.set_frequency(Some(1.0));
        Self {
            cfg,
            terrain,
            warp,
            tunnel,
        }
    }

    /// First air Y of the column before carving.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let n = self.terrain.get_noise_2d(x as f32, z as f32);
        self.cfg.height.base + (n * self.cfg.height.amplitude).round() as i32
    }

    fn carved(&self, x: i32, y: i32, z: i32, surface: i32, floor: i32) -> bool {
        let c = &self.cfg.carvers;
        let soil = (surface - y) as f32;
        if !c.enable || soil <= c.soil_min || y <= floor + c.floor_margin {
            return false;
        }
        let (wx, wy, wz) = (x as f32, y as f32, z as f32);
        let wxw = fractal3(&self.warp, wx, wy, wz, &c.warp);
        let wyw = fractal3(&self.warp, wx + 133.7, wy + 71.3, wz - 19.1, &c.warp);
        let wzw = fractal3(&self.warp, wx - 54.2, wy + 29.7, wz + 88.8, &c.warp);
        let xp = wx + wxw * c.warp_xy;
        let yp = wy + wyw * c.warp_y;
        let zp = wz + wzw * c.warp_xy;
        let tn = fractal3(&self.tunnel, xp, yp * c.y_scale, zp, &c.tunnel);
        let depth01 = (soil / (surface - floor).max(1) as f32).clamp(0.0, 1.0);
        tn.abs() < c.eps_base + c.eps_add * depth01
    }

    fn column_block(&self, y: i32, surface: i32, floor: i32) -> Block {
        let s = &self.cfg.surface;
        let sea = self.cfg.sea_level;
        if y == floor {
            return Block::new(BlockKind::Bedrock);
        }
        if y >= surface {
            return if self.cfg.water.enable && y < sea {
                Block::WATER
            } else {
                Block::AIR
            };
        }
        if y == surface - 1 {
            return if surface - 1 < sea { s.shore } else { s.top };
        }
        if y >= surface - s.topsoil_thickness {
            return s.subsoil;
        }
        if y < s.deep_below { s.deep } else { s.stone }
    }
}

impl ChunkGenerator for CaveGenerator {
    #[inline]
    fn sea_level(&self) -> i32 {
        self.cfg.sea_level
    }

    fn fill(&self, grid: &mut VoxelGrid) {
        let b = grid.bounds();
        let floor = b.min.y;
        let mut carved = 0usize;
        for z in b.min.z..=b.max.z {
            for x in b.min.x..=b.max.x {
                let surface = self.surface_height(x, z);
                for y in b.min.y..=b.max.y {
                    let mut block = self.column_block(y, surface, floor);
                    if block.is_solid() && self.carved(x, y, z, surface, floor) {
                        block = match self.cfg.carvers.lava_level {
                            Some(l) if y <= l => Block::LAVA,
                            _ => Block::CAVE_AIR,
                        };
                        carved += 1;
                    }
                    grid.put(BlockPos::new(x, y, z), block);
                }
            }
        }
        log::debug!(target: "terrain", "cave fill {:?}: {} cells carved", b, carved);
    }
}

fn fractal3(noise: &FastNoiseLite, x: f32, y: f32, z: f32, fractal: &Fractal) -> f32 {
    let mut amp = 1.0_f32;
    let mut freq = 1.0_f32 / fractal.scale.max(0.0001);
    let mut sum = 0.0_f32;
    let mut max_amp = 0.0_f32;
    for _ in 0..fractal.octaves.max(1) {
        sum += noise.get_noise_3d(x * freq, y * freq, z * freq) * amp;
        max_amp += amp;
        amp *= fractal.persistence;
        freq *= fractal.lacunarity;
    }
    if max_amp > 0.0 { sum / max_amp } else { sum }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::BlockGetter;

    fn volume() -> VoxelGrid {
        VoxelGrid::with_size(BlockPos::new(-16, -48, -16), 32, 72, 32)
    }

    #[test]
    fn same_seed_same_terrain() {
        let cfg = TerrainConfig::default();
        let (mut a, mut b) = (volume(), volume());
        CaveGenerator::new(cfg.clone(), 7).fill(&mut a);
        CaveGenerator::new(cfg, 7).fill(&mut b);
        for p in BlockPos::between_closed(a.bounds().min, a.bounds().max) {
            assert_eq!(a.block(p), b.block(p));
        }
    }

    #[test]
    fn floor_is_bedrock_and_top_is_open() {
        let mut g = volume();
        CaveGenerator::new(TerrainConfig::default(), 3).fill(&mut g);
        let b = g.bounds();
        assert!(g.block(BlockPos::new(0, b.min.y, 0)).is(BlockKind::Bedrock));
        assert!(!g.block(BlockPos::new(0, b.max.y, 0)).is_solid());
    }
}
