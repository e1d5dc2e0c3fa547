// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Duration probe for ISO base media files (MP4 and QuickTime).
//!
//! Only box headers are walked: `moov` at the top level, then `mvhd`
//! inside it. Sample data is never touched.

const BOX_HEADER_LEN: usize = 8;

/// Reads the movie duration in seconds from an MP4/MOV container.
///
/// Returns `None` if the data is not a well-formed container or the
/// movie header carries a zero timescale.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn probe_duration_seconds(data: &[u8]) -> Option<f64> {
    let moov: &[u8] = find_box(data, *b"moov")?;
    let mvhd: &[u8] = find_box(moov, *b"mvhd")?;

    let version: u8 = *mvhd.first()?;
    // version (1) + flags (3)
    let fields: &[u8] = mvhd.get(4..)?;
    let (timescale, duration): (u32, u64) = if version == 1 {
        // creation (8) + modification (8) + timescale (4) + duration (8)
        (read_u32(fields, 16)?, read_u64(fields, 20)?)
    } else {
        // creation (4) + modification (4) + timescale (4) + duration (4)
        (read_u32(fields, 8)?, u64::from(read_u32(fields, 12)?))
    };

    if timescale == 0 {
        return None;
    }
    Some(duration as f64 / f64::from(timescale))
}

/// Returns the payload of the first box of type `kind` among the
/// sibling boxes in `data`.
fn find_box(data: &[u8], kind: [u8; 4]) -> Option<&[u8]> {
    let mut offset: usize = 0;
    while offset + BOX_HEADER_LEN <= data.len() {
        let declared: u64 = u64::from(read_u32(data, offset)?);
        let box_type: &[u8] = data.get(offset + 4..offset + 8)?;

        let (header_len, box_len): (usize, usize) = match declared {
            // Box extends to the end of the enclosing data.
            0 => (BOX_HEADER_LEN, data.len() - offset),
            // 64-bit size follows the type.
            1 => {
                let large: u64 = read_u64(data, offset + 8)?;
                (BOX_HEADER_LEN + 8, usize::try_from(large).ok()?)
            }
            size => (BOX_HEADER_LEN, usize::try_from(size).ok()?),
        };

        if box_len < header_len {
            return None;
        }
        let end: usize = offset.checked_add(box_len)?;
        if end > data.len() {
            return None;
        }

        if box_type == kind {
            return data.get(offset + header_len..end);
        }
        offset = end;
    }
    None
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes: [u8; 4] = data.get(at..at + 4)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

fn read_u64(data: &[u8], at: usize) -> Option<u64> {
    let bytes: [u8; 8] = data.get(at..at + 8)?.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}
