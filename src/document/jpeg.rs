// src/document/jpeg.rs
//! Minimal JPEG sniffing — walks marker segments up to the frame header.
//!
//! Only checks structure (SOI, a well-formed segment chain, a SOF with
//! non-zero dimensions). It does not decode entropy-coded data.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegInfo {
    pub width: u16,
    pub height: u16,
}

const SOI: [u8; 2] = [0xFF, 0xD8];

/// SOF0..SOF15 minus DHT (C4), JPG (C8) and DAC (CC)
fn is_start_of_frame(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Returns frame dimensions if `data` is structurally a JPEG.
pub fn sniff_jpeg(data: &[u8]) -> Option<JpegInfo> {
    if !data.starts_with(&SOI) {
        return None;
    }
    let mut pos = SOI.len();
    loop {
        if *data.get(pos)? != 0xFF {
            return None;
        }
        // fill bytes
        while *data.get(pos)? == 0xFF {
            pos += 1;
        }
        let marker = data[pos];
        pos += 1;

        match marker {
            // standalone markers carry no length
            0x01 | 0xD0..=0xD7 => continue,
            // stuffed zero, repeated SOI, EOI or scan data before any frame
            0x00 | 0xD8 | 0xD9 | 0xDA => return None,
            _ => {}
        }

        let len = u16::from_be_bytes([*data.get(pos)?, *data.get(pos + 1)?]) as usize;
        if len < 2 {
            return None;
        }
        let segment = data.get(pos + 2..pos + len)?;

        if is_start_of_frame(marker) {
            // precision(1) height(2) width(2)
            if segment.len() < 5 {
                return None;
            }
            let height = u16::from_be_bytes([segment[1], segment[2]]);
            let width = u16::from_be_bytes([segment[3], segment[4]]);
            if width == 0 || height == 0 {
                return None;
            }
            return Some(JpegInfo { width, height });
        }
        pos += len;
    }
}
