//! Just enough RLP to encode a legacy transaction: byte strings, unsigned integers, one list.

pub(crate) fn bytes(value: &[u8]) -> Vec<u8> {
    if let [single] = value
        && *single < 0x80
    {
        return vec![*single];
    }
    let mut out = header(value.len(), 0x80);
    out.extend_from_slice(value);
    out
}

pub(crate) fn uint(value: u128) -> Vec<u8> {
    big_endian(&value.to_be_bytes())
}

/// A big-endian integer of any width, minus its leading zeros. Zero encodes as the empty string.
pub(crate) fn big_endian(value: &[u8]) -> Vec<u8> {
    let first = value.iter().position(|&b| b != 0).unwrap_or(value.len());
    bytes(&value[first..])
}

/// Wrap already-encoded items in a list.
pub(crate) fn list(items: &[Vec<u8>]) -> Vec<u8> {
    let len = items.iter().map(Vec::len).sum();
    let mut out = header(len, 0xc0);
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

fn header(len: usize, offset: u8) -> Vec<u8> {
    if len < 56 {
        // len < 56 so the cast cannot truncate
        return vec![offset + len as u8];
    }
    let be = (len as u64).to_be_bytes();
    let first = be.iter().position(|&b| b != 0).unwrap_or(be.len());
    let width = be.len() - first;
    let mut out = Vec::with_capacity(1 + width);
    out.push(offset + 55 + width as u8);
    out.extend_from_slice(&be[first..]);
    out
}
