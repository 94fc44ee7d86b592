use strata_blocks::Block;
use strata_geom::{BlockPos, Direction};
use strata_world::BlockGetter;

/// Nearest ceiling and floor around a scanned position. Either bound may be missing.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Column {
    pub ceiling: Option<i32>,
    pub floor: Option<i32>,
}

impl Column {
    #[inline]
    pub fn new(ceiling: Option<i32>, floor: Option<i32>) -> Self {
        Self { ceiling, floor }
    }

    /// Open cells strictly between the bounds, when both exist.
    #[inline]
    pub fn height(&self) -> Option<i32> {
        match (self.ceiling, self.floor) {
            (Some(c), Some(f)) => Some(c - f - 1),
            _ => None,
        }
    }

    #[inline]
    pub fn with_floor(self, floor: Option<i32>) -> Self {
        Self { floor, ..self }
    }

    #[inline]
    pub fn with_ceiling(self, ceiling: Option<i32>) -> Self {
        Self { ceiling, ..self }
    }

    /// Walks up and down from `pos` while `column` holds, at most
    /// `max_distance - 1` cells each way, and records the cell it stops on as
    /// a bound when it satisfies `tip`. `None` when `pos` itself fails `column`.
    pub fn scan<W, C, T>(level: &W, pos: BlockPos, max_distance: i32, column: C, tip: T) -> Option<Column>
    where
        W: BlockGetter + ?Sized,
        C: Fn(Block) -> bool,
        T: Fn(Block) -> bool,
    {
        if !column(level.block(pos)) {
            return None;
        }
        let ceiling = scan_direction(level, pos, max_distance, &column, &tip, Direction::Up);
        let floor = scan_direction(level, pos, max_distance, &column, &tip, Direction::Down);
        Some(Column { ceiling, floor })
    }
}

fn scan_direction<W, C, T>(
    level: &W,
    start: BlockPos,
    max_distance: i32,
    column: &C,
    tip: &T,
    dir: Direction,
) -> Option<i32>
where
    W: BlockGetter + ?Sized,
    C: Fn(Block) -> bool,
    T: Fn(Block) -> bool,
{
    let mut m = start;
    let mut i = 1;
    while i < max_distance && column(level.block(m)) {
        m = m.relative(dir);
        i += 1;
    }
    tip(level.block(m)).then_some(m.y)
}
