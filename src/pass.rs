//! Geometry of the coarse-to-fine refinement passes.

use crate::screen;

/// Number of refinement passes in one render cycle.
pub const PASS_COUNT: u8 = 4;

/// One sweep over the canvas at a fixed block size. Pass 0 is the coarsest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pass(u8);

impl Pass {
    pub const FIRST: Self = Pass(0);
    pub const LAST: Self = Pass(PASS_COUNT - 1);

    pub fn new(index: u8) -> Option<Self> {
        (index < PASS_COUNT).then_some(Pass(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Side of the square block painted per evaluation, `2^(3 - pass)`.
    pub fn block_size(self) -> u32 {
        1 << (Self::LAST.0 - self.0)
    }

    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

/// Top-left pixel and side of one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

/// Row-major tiling of a canvas by one pass's blocks. Partial blocks on the
/// right and bottom edges are included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tiling {
    block_size: u32,
    columns: u32,
    rows: u32,
}

impl Tiling {
    pub fn new(pass: Pass, size: screen::Size) -> Self {
        let block_size = pass.block_size();
        Self {
            block_size,
            columns: size.width.div_ceil(block_size),
            rows: size.height.div_ceil(block_size),
        }
    }

    pub fn block_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// Block at linear scan index `cursor`, which must be below
    /// [`Tiling::block_count`].
    pub fn block(&self, cursor: u64) -> Block {
        debug_assert!(cursor < self.block_count());
        let columns = u64::from(self.columns);
        let column = (cursor % columns) as u32;
        let row = (cursor / columns) as u32;
        Block {
            x: column * self.block_size,
            y: row * self.block_size,
            size: self.block_size,
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        (0..self.block_count()).map(move |cursor| self.block(cursor))
    }
}
