//! Utility functions for address and block calculations.
//!
//! These helpers are useful when choosing which blocks to hand to
//! [`Link::download`](crate::radio::Link::download) or
//! [`Link::upload`](crate::radio::Link::upload), or when implementing a custom
//! [`UploadPolicy`](crate::radio::UploadPolicy).

use crate::radio::{
    RadioError,
    image::{BLOCK_COUNT, BLOCK_SIZE, IMAGE_SIZE},
};

/// Calculates which blocks are spanned by an address range.
///
/// Returns the inclusive range `(start_block, end_block)` for the given
/// address and length, or an error if the range is invalid.
///
/// # Errors
/// * [`RadioError::ZeroLength`] - if `len` is 0
/// * [`RadioError::OutOfBounds`] - if the range exceeds the image
///
/// # Example
/// ```
/// use thd72_clone::radio::helpers::block_span;
///
/// // A channel record at 0x1500 sits entirely in block 0x15
/// assert_eq!(block_span(0x1500, 16).unwrap(), (0x15, 0x15));
///
/// // Four bytes at 0x15FE cross into the next block
/// assert_eq!(block_span(0x15FE, 4).unwrap(), (0x15, 0x16));
/// ```
pub fn block_span(addr: usize, len: usize) -> Result<(usize, usize), RadioError> {
    let (offset, end) = range_span(addr, len)?;
    let sb = offset / BLOCK_SIZE;
    let eb = (end - 1) / BLOCK_SIZE; // inclusive

    if eb >= BLOCK_COUNT {
        return Err(RadioError::OutOfBounds);
    }

    Ok((sb, eb))
}

/// Calculates the byte offset range for an address and length.
///
/// Returns `(start_offset, end_offset)` where end is exclusive,
/// or an error if the range is invalid.
pub fn range_span(addr: usize, len: usize) -> Result<(usize, usize), RadioError> {
    if len == 0 {
        return Err(RadioError::ZeroLength);
    }

    let end = addr.checked_add(len).ok_or(RadioError::OutOfBounds)?;

    if end > IMAGE_SIZE {
        return Err(RadioError::OutOfBounds);
    }

    Ok((addr, end))
}

/// Converts an address window into the list of blocks that cover it.
///
/// `last == 0` means "up to the ceiling". For uploads the ceiling stops
/// 512 bytes short of the image end, leaving the trailing blocks alone.
/// A `last` address that is not block aligned is rounded up so the block
/// containing it is included.
///
/// ```
/// use thd72_clone::radio::helpers::block_range;
///
/// assert_eq!(block_range(0x1500, 0x1510, false).unwrap(), vec![0x15]);
/// assert_eq!(block_range(0, 0, true).unwrap().len(), 254);
/// ```
pub fn block_range(first: usize, last: usize, for_upload: bool) -> Result<Vec<usize>, RadioError> {
    let ceiling = if for_upload {
        IMAGE_SIZE - 2 * BLOCK_SIZE
    } else {
        IMAGE_SIZE
    };

    if first >= IMAGE_SIZE {
        return Err(RadioError::InvalidValue {
            field: "first address",
            value: format!("{first:#06x}"),
        });
    }
    if (last > 0 && last < first) || last > ceiling {
        return Err(RadioError::InvalidValue {
            field: "last address",
            value: format!("{last:#06x}"),
        });
    }

    let last = if last == 0 { ceiling } else { last };
    Ok((first / BLOCK_SIZE..last.div_ceil(BLOCK_SIZE)).collect())
}
