//! Compact length encoding and length-prefixed sequences.
//!
//! Lengths are encoded as little-endian groups of seven bits with the top bit
//! of each byte set if more bytes follow.  Since lengths are limited to
//! `u16`, encoding takes at most three bytes:
//!
//! | value range     | bytes |
//! |-----------------|-------|
//! | `0..=0x7f`      | 1     |
//! | `0x80..=0x3fff` | 2     |
//! | `0x4000..`      | 3     |
//!
//! This is the same format Solana uses for vector lengths in transactions.
//!
//! Decoding functions take the buffer and an offset into it and return the
//! decoded value together with the number of bytes it occupied.  The offset
//! of the next value is thus `offset + consumed`.

use crate::error::{InvalidArgument, Malformed};
use crate::Result;

/// Maximum number of bytes an encoded length occupies.
pub const MAX_ENCODING_LENGTH: usize = 3;


/// Appends encoded `len` to `out`.
///
/// Fails with [`InvalidArgument::SequenceTooLong`] if `len` doesn’t fit
/// `u16`.
pub fn encode_len(len: usize, out: &mut Vec<u8>) -> Result {
    let mut value = checked_len(len)?;
    while value > 0x7f {
        out.push(value as u8 | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
    Ok(())
}

/// Converts sequence length to `u16` failing if it’s out of range.
pub fn checked_len(len: usize) -> Result<u16> {
    u16::try_from(len)
        .map_err(|_| InvalidArgument::SequenceTooLong(len).into())
}

/// Returns number of bytes encoded `len` takes.
pub const fn encoded_len_size(len: u16) -> usize {
    match len {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        _ => 3,
    }
}

/// Decodes a length starting at `bytes[offset]`.
///
/// Returns the length and number of bytes it was encoded in.  Only the
/// shortest encoding of a value is accepted.
pub fn decode_len(bytes: &[u8], offset: usize) -> Result<(u16, usize)> {
    let input = bytes.get(offset..).ok_or(Malformed::UnexpectedEnd)?;
    let mut value = 0u32;
    for (nth, &byte) in input.iter().enumerate() {
        if byte == 0 && nth != 0 {
            return Err(Malformed::Alias.into());
        }
        value |= u32::from(byte & 0x7f) << (nth * 7);
        if byte & 0x80 == 0 {
            let value =
                u16::try_from(value).map_err(|_| Malformed::Overflow)?;
            return Ok((value, nth + 1));
        }
        if nth + 1 == MAX_ENCODING_LENGTH {
            return Err(Malformed::TooLong.into());
        }
    }
    Err(Malformed::UnexpectedEnd.into())
}


/// Appends length-prefixed sequence of `items` to `out`.
///
/// Each element is written with `encode` in order.  Fails if there are more
/// than `u16::MAX` items.
pub fn encode_seq<T>(
    items: &[T],
    out: &mut Vec<u8>,
    mut encode: impl FnMut(&T, &mut Vec<u8>) -> Result,
) -> Result {
    encode_len(items.len(), out)?;
    items.iter().try_for_each(|item| encode(item, out))
}

/// Decodes length-prefixed sequence starting at `bytes[offset]`.
///
/// `decode` is called with the buffer and offset of each element and must
/// return the element and number of bytes it occupied.  Returns decoded items
/// and total number of bytes consumed including the length prefix.
pub fn decode_seq<T>(
    bytes: &[u8],
    offset: usize,
    mut decode: impl FnMut(&[u8], usize) -> Result<(T, usize)>,
) -> Result<(Vec<T>, usize)> {
    let (len, mut consumed) = decode_len(bytes, offset)?;
    // The declared length comes from untrusted input; don’t reserve more
    // than the buffer could possibly hold.
    let remaining = bytes.len().saturating_sub(offset + consumed);
    let mut items = Vec::with_capacity(usize::from(len).min(remaining));
    for _ in 0..len {
        let (item, size) = decode(bytes, offset + consumed)?;
        items.push(item);
        consumed += size;
    }
    Ok((items, consumed))
}
