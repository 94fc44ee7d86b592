use core::fmt;

use serde::{Deserialize, Serialize};
use strata_geom::Direction;

use crate::state::{self, DripstoneThickness};
use crate::tags::BlockTag;

macro_rules! block_kinds {
    ($($variant:ident => $name:literal,)*) => {
        /// Every block kind the placement engine reads or writes.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum BlockKind {
            $(#[serde(rename = $name)] $variant,)*
        }

        impl BlockKind {
            pub const ALL: &'static [BlockKind] = &[$(BlockKind::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(BlockKind::$variant => $name,)*
                }
            }

            pub fn from_name(name: &str) -> Option<BlockKind> {
                match name {
                    $($name => Some(BlockKind::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

block_kinds! {
    Air => "air",
    CaveAir => "cave_air",
    VoidAir => "void_air",
    Stone => "stone",
    Granite => "granite",
    Diorite => "diorite",
    Andesite => "andesite",
    Deepslate => "deepslate",
    Tuff => "tuff",
    Bedrock => "bedrock",
    Dirt => "dirt",
    CoarseDirt => "coarse_dirt",
    GrassBlock => "grass_block",
    DirtPath => "dirt_path",
    RootedDirt => "rooted_dirt",
    MossBlock => "moss_block",
    Clay => "clay",
    Gravel => "gravel",
    Sand => "sand",
    Water => "water",
    Lava => "lava",
    DripstoneBlock => "dripstone_block",
    PointedDripstone => "pointed_dripstone",
    HangingRoots => "hanging_roots",
    MossCarpet => "moss_carpet",
    Grass => "grass",
    Azalea => "azalea",
    FloweringAzalea => "flowering_azalea",
    AzaleaLeaves => "azalea_leaves",
    OakLog => "oak_log",
    Netherrack => "netherrack",
    WarpedNylium => "warped_nylium",
    WarpedWartBlock => "warped_wart_block",
    Blackstone => "blackstone",
    Basalt => "basalt",
    TwistingVines => "twisting_vines",
    TwistingVinesPlant => "twisting_vines_plant",
    Vine => "vine",
    Ice => "ice",
    PackedIce => "packed_ice",
    BlueIce => "blue_ice",
    EndStone => "end_stone",
    BoneBlock => "bone_block",
    CoalOre => "coal_ore",
    DeepslateCoalOre => "deepslate_coal_ore",
    MossyCobblestone => "mossy_cobblestone",
    HayBlock => "hay_block",
}

/// Collision outline class; drives face sturdiness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Shape {
    Empty,
    Fluid,
    Cube,
    /// Full footprint, one pixel short of a cube.
    Path,
    Carpet,
    /// Thin plant or spike outline.
    Cross,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FluidState {
    Empty,
    Water,
    Lava,
}

impl FluidState {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, FluidState::Empty)
    }

    #[inline]
    pub fn is_water(self) -> bool {
        matches!(self, FluidState::Water)
    }

    #[inline]
    pub fn is_lava(self) -> bool {
        matches!(self, FluidState::Lava)
    }
}

impl BlockKind {
    pub const fn shape(self) -> Shape {
        use BlockKind::*;
        match self {
            Air | CaveAir | VoidAir => Shape::Empty,
            Water | Lava => Shape::Fluid,
            DirtPath => Shape::Path,
            MossCarpet => Shape::Carpet,
            PointedDripstone | HangingRoots | Grass | Azalea | FloweringAzalea | TwistingVines
            | TwistingVinesPlant | Vine => Shape::Cross,
            _ => Shape::Cube,
        }
    }

    #[inline]
    pub const fn is_air(self) -> bool {
        matches!(self, BlockKind::Air | BlockKind::CaveAir | BlockKind::VoidAir)
    }

    /// Material blocks movement. Pointed dripstone counts as stone material.
    #[inline]
    pub const fn is_solid(self) -> bool {
        matches!(self.shape(), Shape::Cube | Shape::Path)
            || matches!(self, BlockKind::PointedDripstone)
    }

    /// Material may be overwritten in place (air, fluids, soft plants).
    #[inline]
    pub const fn is_replaceable(self) -> bool {
        use BlockKind::*;
        matches!(
            self,
            Air | CaveAir
                | VoidAir
                | Water
                | Lava
                | Grass
                | Vine
                | HangingRoots
                | TwistingVines
                | TwistingVinesPlant
        )
    }

    #[inline]
    pub const fn is_waterloggable(self) -> bool {
        matches!(self, BlockKind::PointedDripstone | BlockKind::HangingRoots)
    }

    pub const fn default_state(self) -> u16 {
        match self {
            BlockKind::PointedDripstone => state::pack_dripstone(Direction::Up, DripstoneThickness::Tip, false),
            _ => 0,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A block kind plus its packed property bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "BlockKind", into = "BlockKind")]
pub struct Block {
    pub kind: BlockKind,
    pub state: u16,
}

impl Block {
    pub const AIR: Block = Block::new(BlockKind::Air);
    pub const CAVE_AIR: Block = Block::new(BlockKind::CaveAir);
    pub const VOID_AIR: Block = Block::new(BlockKind::VoidAir);
    pub const STONE: Block = Block::new(BlockKind::Stone);
    pub const WATER: Block = Block::new(BlockKind::Water);
    pub const LAVA: Block = Block::new(BlockKind::Lava);
    pub const DRIPSTONE_BLOCK: Block = Block::new(BlockKind::DripstoneBlock);

    /// Default state of `kind`.
    #[inline]
    pub const fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            state: kind.default_state(),
        }
    }

    #[inline]
    pub fn is(self, kind: BlockKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn is_in(self, tag: BlockTag) -> bool {
        tag.contains(self.kind)
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.kind.is_air()
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self.kind.is_solid()
    }

    #[inline]
    pub fn is_replaceable(self) -> bool {
        self.kind.is_replaceable()
    }

    #[inline]
    pub fn shape(self) -> Shape {
        self.kind.shape()
    }

    pub fn fluid_state(self) -> FluidState {
        match self.kind {
            BlockKind::Water => FluidState::Water,
            BlockKind::Lava => FluidState::Lava,
            _ if self.is_waterlogged() => FluidState::Water,
            _ => FluidState::Empty,
        }
    }

    /// Whether the given face offers full support to a neighbour.
    pub fn is_face_sturdy(self, face: Direction) -> bool {
        match self.shape() {
            Shape::Cube => true,
            Shape::Path => face == Direction::Down,
            _ => false,
        }
    }

    pub fn pointed_dripstone(direction: Direction, thickness: DripstoneThickness) -> Block {
        Block {
            kind: BlockKind::PointedDripstone,
            state: state::pack_dripstone(direction, thickness, false),
        }
    }

    pub fn dripstone_thickness(self) -> Option<DripstoneThickness> {
        self.is(BlockKind::PointedDripstone)
            .then(|| state::dripstone_thickness(self.state))
    }

    /// Tip direction of a pointed dripstone.
    pub fn vertical_direction(self) -> Option<Direction> {
        self.is(BlockKind::PointedDripstone)
            .then(|| state::dripstone_direction(self.state))
    }

    #[inline]
    pub fn is_waterlogged(self) -> bool {
        self.kind.is_waterloggable() && self.state & state::WATERLOGGED_BIT != 0
    }

    /// Sets the waterlogged flag; blocks without the property are returned unchanged.
    pub fn with_waterlogged(self, waterlogged: bool) -> Block {
        if !self.kind.is_waterloggable() {
            return self;
        }
        let state = if waterlogged {
            self.state | state::WATERLOGGED_BIT
        } else {
            self.state & !state::WATERLOGGED_BIT
        };
        Block { state, ..self }
    }

    #[inline]
    pub fn has_age(self) -> bool {
        self.is(BlockKind::TwistingVines)
    }

    pub fn age(self) -> Option<u8> {
        self.has_age().then_some((self.state & state::AGE_MASK) as u8)
    }

    pub fn with_age(self, age: u8) -> Block {
        if !self.has_age() {
            return self;
        }
        let age = u16::from(age.min(state::MAX_PLANT_AGE));
        Block {
            state: (self.state & !state::AGE_MASK) | age,
            ..self
        }
    }

    pub fn with_vine_face(self, face: Direction, attached: bool) -> Block {
        match (self.kind, state::vine_face_bit(face)) {
            (BlockKind::Vine, Some(bit)) => Block {
                state: if attached {
                    self.state | bit
                } else {
                    self.state & !bit
                },
                ..self
            },
            _ => self,
        }
    }

    pub fn has_vine_face(self, face: Direction) -> bool {
        match (self.kind, state::vine_face_bit(face)) {
            (BlockKind::Vine, Some(bit)) => self.state & bit != 0,
            _ => false,
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::AIR
    }
}

impl From<BlockKind> for Block {
    fn from(kind: BlockKind) -> Self {
        Block::new(kind)
    }
}

impl From<Block> for BlockKind {
    fn from(block: Block) -> Self {
        block.kind
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.dripstone_thickness(), self.vertical_direction()) {
            (Some(t), Some(d)) => write!(
                f,
                "{}[thickness={},vertical_direction={}]",
                self.kind,
                t.name(),
                if d == Direction::Up { "up" } else { "down" }
            ),
            _ => match self.age() {
                Some(age) => write!(f, "{}[age={age}]", self.kind),
                None => f.write_str(self.kind.name()),
            },
        }
    }
}
