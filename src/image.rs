//! Pixel dimension probes for raster image formats.
//!
//! Only the header is inspected; the pixel data is never decoded. Formats we
//! cannot probe fall back to a nominal 400x300 so insertion still succeeds.

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Fallback for images whose header we cannot read.
pub const FALLBACK: Dimensions = Dimensions {
    width: 400,
    height: 300,
};

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

/// Probe the pixel dimensions of an image from its leading bytes.
///
/// PNG and JPEG are recognized; anything else (GIF, BMP, SVG, truncated
/// data) yields [`FALLBACK`].
pub fn probe(data: &[u8]) -> Dimensions {
    png_dimensions(data)
        .or_else(|| jpeg_dimensions(data))
        .unwrap_or(FALLBACK)
}

/// PNG stores dimensions in the IHDR chunk, which the format requires to be
/// first: width at byte 16 and height at byte 20, both big-endian u32.
fn png_dimensions(data: &[u8]) -> Option<Dimensions> {
    if data.len() < 24 || data[..8] != PNG_SIGNATURE {
        return None;
    }
    let width = u32::from_be_bytes(data[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(data[20..24].try_into().ok()?);
    Some(Dimensions { width, height })
}

/// Walk JPEG marker segments until a start-of-frame marker; the frame header
/// carries height then width as big-endian u16.
fn jpeg_dimensions(data: &[u8]) -> Option<Dimensions> {
    if data.len() < 4 || data[0] != 0xff || data[1] != 0xd8 {
        return None;
    }

    let mut offset = 2;
    while offset + 4 <= data.len() {
        if data[offset] != 0xff {
            return None;
        }
        let marker = data[offset + 1];
        // SOF0 (baseline) and SOF2 (progressive) carry the frame dimensions.
        if marker == 0xc0 || marker == 0xc2 {
            if offset + 9 > data.len() {
                return None;
            }
            let height = u16::from_be_bytes([data[offset + 5], data[offset + 6]]);
            let width = u16::from_be_bytes([data[offset + 7], data[offset + 8]]);
            return Some(Dimensions {
                width: width.into(),
                height: height.into(),
            });
        }
        let length = u16::from_be_bytes([data[offset + 2], data[offset + 3]]) as usize;
        if length < 2 {
            return None;
        }
        offset += 2 + length;
    }
    None
}
