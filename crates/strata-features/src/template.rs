//! Inline structure templates and the processors applied while placing them.

use std::collections::BTreeMap;

use serde::Deserialize;
use strata_blocks::{Block, BlockKind, BlockTag};
use strata_geom::{BlockPos, BoundingBox, Rotation};
use strata_world::{BlockGetter, RandomSource, UpdateFlags, WorldAccess};

/// A block cuboid. Cells left out are structure void and keep whatever the
/// volume already holds.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "RawTemplate")]
pub struct StructureTemplate {
    size: (i32, i32, i32),
    blocks: Vec<(BlockPos, Block)>,
}

/// `layers[y][z]` is a row string indexed by x; each char looks up `palette`.
/// `.` and space are void.
#[derive(Deserialize)]
struct RawTemplate {
    palette: BTreeMap<char, Block>,
    layers: Vec<Vec<String>>,
}

impl TryFrom<RawTemplate> for StructureTemplate {
    type Error = String;

    fn try_from(raw: RawTemplate) -> Result<Self, Self::Error> {
        let sy = raw.layers.len() as i32;
        let sz = raw.layers.iter().map(Vec::len).max().unwrap_or(0) as i32;
        let sx = raw
            .layers
            .iter()
            .flatten()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0) as i32;
        let mut blocks = Vec::new();
        for (y, layer) in raw.layers.iter().enumerate() {
            for (z, row) in layer.iter().enumerate() {
                for (x, ch) in row.chars().enumerate() {
                    if ch == '.' || ch == ' ' {
                        continue;
                    }
                    let block = *raw
                        .palette
                        .get(&ch)
                        .ok_or_else(|| format!("template char '{ch}' is not in the palette"))?;
                    blocks.push((BlockPos::new(x as i32, y as i32, z as i32), block));
                }
            }
        }
        if blocks.is_empty() {
            return Err("template has no blocks".into());
        }
        Ok(StructureTemplate {
            size: (sx, sy, sz),
            blocks,
        })
    }
}

impl StructureTemplate {
    pub fn new(size: (i32, i32, i32), blocks: Vec<(BlockPos, Block)>) -> Self {
        Self { size, blocks }
    }

    #[inline]
    pub fn size(&self) -> (i32, i32, i32) {
        self.size
    }

    /// Footprint size after `rotation`, as `(x, y, z)`.
    pub fn rotated_size(&self, rotation: Rotation) -> (i32, i32, i32) {
        let (sx, sy, sz) = self.size;
        let (rx, rz) = rotation.rotate_size(sx, sz);
        (rx, sy, rz)
    }

    /// Box the template occupies with its minimum corner at `corner`.
    pub fn bounding_box(&self, corner: BlockPos, rotation: Rotation) -> BoundingBox {
        let (sx, sy, sz) = self.rotated_size(rotation);
        BoundingBox::from_origin_size(corner, sx, sy, sz)
    }

    /// Writes every template block that survives `processors` and falls inside `clip`.
    pub fn place(
        &self,
        level: &mut dyn WorldAccess,
        corner: BlockPos,
        rotation: Rotation,
        clip: &BoundingBox,
        processors: &[StructureProcessor],
        random: &mut dyn RandomSource,
    ) -> usize {
        let (sx, _, sz) = self.size;
        let mut placed = 0;
        for &(local, block) in &self.blocks {
            let (rx, rz) = rotation.rotate_in_footprint(local.x, local.z, sx, sz);
            let pos = corner.offset(rx, local.y, rz);
            if !clip.contains(pos) {
                continue;
            }
            let existing = level.block(pos);
            let processed = processors
                .iter()
                .try_fold(block, |b, p| p.process(existing, b, random));
            if let Some(b) = processed {
                if level.set_block(pos, b, UpdateFlags(4)) {
                    placed += 1;
                }
            }
        }
        placed
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructureProcessor {
    /// Keeps each block with probability `integrity`.
    Integrity { integrity: f32 },
    /// Leaves cells whose current block is in `tag` untouched.
    ProtectedBlocks { tag: BlockTag },
}

impl StructureProcessor {
    pub fn process(&self, existing: Block, block: Block, random: &mut dyn RandomSource) -> Option<Block> {
        match *self {
            StructureProcessor::Integrity { integrity } => {
                (integrity >= 1.0 || random.next_float() <= integrity).then_some(block)
            }
            StructureProcessor::ProtectedBlocks { tag } => (!existing.is_in(tag)).then_some(block),
        }
    }

    pub fn check(&self) -> Result<(), String> {
        match *self {
            StructureProcessor::Integrity { integrity } if !(0.0..=1.0).contains(&integrity) => {
                Err(format!("integrity {integrity} outside [0, 1]"))
            }
            _ => Ok(()),
        }
    }
}

/// Counts corners of `bb` that are open (air, water or lava).
pub fn count_empty_corners<W: BlockGetter + ?Sized>(level: &W, bb: &BoundingBox) -> i32 {
    bb.corners()
        .into_iter()
        .filter(|&p| {
            let b = level.block(p);
            b.is_air() || b.is(BlockKind::Water) || b.is(BlockKind::Lava)
        })
        .count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::{VoxelGrid, WorldRandom};

    fn parse(src: &str) -> Result<StructureTemplate, toml::de::Error> {
        #[derive(Deserialize)]
        struct Doc {
            t: StructureTemplate,
        }
        toml::from_str::<Doc>(src).map(|d| d.t)
    }

    #[test]
    fn layers_define_size_and_void() {
        let t = parse(
            r#"
            [t]
            palette = { B = "bone_block" }
            layers = [["BBB", "B.B"], ["..B"]]
            "#,
        )
        .unwrap();
        assert_eq!(t.size(), (3, 2, 2));
        assert_eq!(t.blocks.len(), 6);
        assert_eq!(t.rotated_size(Rotation::Clockwise90), (2, 2, 3));
    }

    #[test]
    fn unknown_palette_char_fails() {
        assert!(parse("[t]\npalette = {}\nlayers = [[\"X\"]]\n").is_err());
    }

    #[test]
    fn protected_blocks_keep_bedrock() {
        let t = StructureTemplate::new(
            (2, 1, 1),
            vec![
                (BlockPos::new(0, 0, 0), Block::new(BlockKind::BoneBlock)),
                (BlockPos::new(1, 0, 0), Block::new(BlockKind::BoneBlock)),
            ],
        );
        let mut g = VoxelGrid::with_size(BlockPos::new(0, 0, 0), 2, 1, 1);
        g.put(BlockPos::new(1, 0, 0), Block::new(BlockKind::Bedrock));
        let clip = g.bounds();
        let procs = [StructureProcessor::ProtectedBlocks {
            tag: BlockTag::FeaturesCannotReplace,
        }];
        let n = t.place(&mut g, BlockPos::ZERO, Rotation::None, &clip, &procs, &mut WorldRandom::new(0));
        assert_eq!(n, 1);
        assert!(g.block(BlockPos::new(1, 0, 0)).is(BlockKind::Bedrock));
    }
}
