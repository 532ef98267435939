use alloc::vec::Vec;

use arrayref::{array_mut_ref, array_ref};

use crate::error::{CodecError, CodecResult};
use crate::platform::Platform;

/// Width and height of a block
pub const BLOCK_SIZE: usize = 8;

/// Number of samples in a block
pub const BLOCK_LEN: usize = BLOCK_SIZE * BLOCK_SIZE;

/// # Block layout of a plane
///
/// Blocks are stored row-major, each block row-major as well. Blocks in the
/// last column / row are partial whenever the plane size is not a multiple of 8.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BlockGrid {
    width: usize,
    height: usize,
    blocks_x: usize,
    blocks_y: usize,
    full_x: usize,
    full_y: usize,
}

impl BlockGrid {
    pub fn new(width: usize, height: usize) -> BlockGrid {
        BlockGrid {
            width,
            height,
            blocks_x: ceil_div(width, BLOCK_SIZE),
            blocks_y: ceil_div(height, BLOCK_SIZE),
            full_x: width / BLOCK_SIZE,
            full_y: height / BLOCK_SIZE,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn blocks_x(&self) -> usize {
        self.blocks_x
    }

    pub fn blocks_y(&self) -> usize {
        self.blocks_y
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks_x * self.blocks_y
    }

    /// Samples needed for a plane of this size
    pub fn plane_len(&self) -> usize {
        self.width * self.height
    }

    /// Samples needed to hold every block of this grid
    pub fn blocks_len(&self) -> usize {
        self.num_blocks() * BLOCK_LEN
    }

    #[inline(always)]
    fn block_offset(&self, bx: usize, by: usize) -> usize {
        (by * self.blocks_x + bx) * BLOCK_LEN
    }

    #[inline(always)]
    fn plane_offset(&self, bx: usize, by: usize) -> usize {
        by * BLOCK_SIZE * self.width + bx * BLOCK_SIZE
    }

    fn has_partial_column(&self) -> bool {
        self.blocks_x > self.full_x
    }

    fn has_partial_row(&self) -> bool {
        self.blocks_y > self.full_y
    }

    /// Visits every block that touches the right or bottom border with its
    /// number of valid columns and rows.
    fn for_each_edge_block<F: FnMut(usize, usize, usize, usize)>(&self, mut f: F) {
        if self.has_partial_column() {
            let bx = self.full_x;
            let valid_x = self.width - bx * BLOCK_SIZE;

            for by in 0..self.blocks_y {
                let valid_y = (self.height - by * BLOCK_SIZE).min(BLOCK_SIZE);
                f(bx, by, valid_x, valid_y);
            }
        }

        if self.has_partial_row() {
            let by = self.full_y;
            let valid_y = self.height - by * BLOCK_SIZE;

            // The corner block was already visited with the right column
            for bx in 0..self.full_x {
                f(bx, by, BLOCK_SIZE, valid_y);
            }
        }
    }
}

fn ceil_div(value: usize, div: usize) -> usize {
    value / div + usize::from(value % div != 0)
}

fn validate(grid: &BlockGrid, plane: &[i32], blocks: &[i32]) -> CodecResult<()> {
    if grid.width == 0 || grid.height == 0 {
        return Err(CodecError::InvalidDimensions {
            width: saturating_i32(grid.width),
            height: saturating_i32(grid.height),
        });
    }

    if plane.is_empty() || blocks.is_empty() {
        return Err(CodecError::NullPointer);
    }

    if plane.len() < grid.plane_len() {
        return Err(CodecError::BadImageData {
            length: plane.len(),
            required: grid.plane_len(),
        });
    }

    if blocks.len() < grid.blocks_len() {
        return Err(CodecError::BadImageData {
            length: blocks.len(),
            required: grid.blocks_len(),
        });
    }

    Ok(())
}

fn saturating_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Splits a `width`×`height` plane into 8×8 blocks.
///
/// The block buffer is requested from `platform`. Samples outside the plane
/// are zero.
pub fn extract_blocks<P: Platform>(
    platform: &mut P,
    plane: &[i32],
    width: usize,
    height: usize,
) -> CodecResult<Vec<i32>> {
    let grid = BlockGrid::new(width, height);

    if plane.is_empty() {
        return Err(CodecError::NullPointer);
    }

    let mut blocks: Vec<i32> = platform.allocate(grid.blocks_len(), "extracting blocks")?;
    extract_blocks_into(&grid, plane, &mut blocks)?;

    Ok(blocks)
}

/// Splits a plane into an existing block buffer of at least `grid.blocks_len()` samples.
pub fn extract_blocks_into(grid: &BlockGrid, plane: &[i32], blocks: &mut [i32]) -> CodecResult<()> {
    validate(grid, plane, blocks)?;

    for by in 0..grid.full_y {
        for bx in 0..grid.full_x {
            let block = array_mut_ref![blocks, grid.block_offset(bx, by), BLOCK_LEN];
            let origin = grid.plane_offset(bx, by);

            for (y, row) in block.chunks_exact_mut(BLOCK_SIZE).enumerate() {
                let start = origin + y * grid.width;
                row.copy_from_slice(&plane[start..start + BLOCK_SIZE]);
            }
        }
    }

    grid.for_each_edge_block(|bx, by, valid_x, valid_y| {
        let block = array_mut_ref![blocks, grid.block_offset(bx, by), BLOCK_LEN];
        let origin = grid.plane_offset(bx, by);

        block.fill(0);

        for (y, row) in block.chunks_exact_mut(BLOCK_SIZE).take(valid_y).enumerate() {
            let start = origin + y * grid.width;
            row[..valid_x].copy_from_slice(&plane[start..start + valid_x]);
        }
    });

    Ok(())
}

/// Writes blocks back into a `width`×`height` plane, dropping the padding.
pub fn reconstruct_plane(
    blocks: &[i32],
    width: usize,
    height: usize,
    plane: &mut [i32],
) -> CodecResult<()> {
    let grid = BlockGrid::new(width, height);
    validate(&grid, plane, blocks)?;

    for by in 0..grid.full_y {
        for bx in 0..grid.full_x {
            let block = array_ref![blocks, grid.block_offset(bx, by), BLOCK_LEN];
            let origin = grid.plane_offset(bx, by);

            for (y, row) in block.chunks_exact(BLOCK_SIZE).enumerate() {
                let start = origin + y * grid.width;
                plane[start..start + BLOCK_SIZE].copy_from_slice(row);
            }
        }
    }

    grid.for_each_edge_block(|bx, by, valid_x, valid_y| {
        let block = array_ref![blocks, grid.block_offset(bx, by), BLOCK_LEN];
        let origin = grid.plane_offset(bx, by);

        for (y, row) in block.chunks_exact(BLOCK_SIZE).take(valid_y).enumerate() {
            let start = origin + y * grid.width;
            plane[start..start + valid_x].copy_from_slice(&row[..valid_x]);
        }
    });

    Ok(())
}
