//! Radial sector layout shared by the code writer and reader.

use std::f32::consts::TAU;

use glam::Vec2;
use image::Rgba;

/// Working radius in pixels. Codes are square images of `2 * RADIUS` pixels.
pub const RADIUS: u32 = 256;
/// Working image edge length in pixels.
pub const SIZE: u32 = RADIUS * 2;
/// Radius of the solid center disc.
pub const CORE_RADIUS: f32 = 40.0;
/// Radial thickness of one ring of sectors.
pub const RING_WIDTH: f32 = 12.0;
/// Number of sector rings around the core.
pub const RING_COUNT: usize = 17;
/// Target arc length of one sector at its middle radius.
pub const SECTOR_ARC: f32 = 12.0;
/// Header symbols: 5 for the 10 bit byte count, 4 for the 8 bit checksum.
pub const HEADER_SYMBOLS: usize = 9;
pub const COUNT_SYMBOLS: usize = 5;
/// Each byte is stored as four 2 bit symbols, least significant first.
pub const SYMBOLS_PER_BYTE: usize = 4;
/// Largest byte count the header can express.
pub const MAX_BYTE_COUNT: usize = 1023;
/// Maximum RGBA distance, in normalized units, for a sample to match a quad.
pub const TOLERANCE: f32 = 0.2;

/// The four symbol colors.
pub const QUAD_COLORS: [Rgba<u8>; 4] = [
    Rgba([26, 31, 51, 255]),
    Rgba([230, 89, 51, 255]),
    Rgba([242, 230, 191, 255]),
    Rgba([51, 166, 153, 255]),
];
pub const CORE_COLOR: Rgba<u8> = Rgba([230, 89, 51, 255]);
pub const BACKGROUND_COLOR: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Euclidean distance between two colors, with channels scaled to `[0, 1]`.
pub fn color_distance(a: &Rgba<u8>, b: &Rgba<u8>) -> f32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let d = (x as f32 - y as f32) / 255.0;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

/// The symbol whose quad color lies within tolerance of `color`.
pub fn match_quad(color: &Rgba<u8>) -> Option<u8> {
    QUAD_COLORS
        .iter()
        .position(|quad| color_distance(color, quad) < TOLERANCE)
        .map(|symbol| symbol as u8)
}

/// CRC-8 (polynomial 0x07, zero init) over the payload.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |mut crc, &byte| {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
        crc
    })
}

/// One angular cell of a ring, holding a single symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub ring: usize,
    pub index: usize,
    /// Sectors in this ring.
    pub count: usize,
}

impl Sector {
    #[inline]
    pub fn inner_radius(&self) -> f32 {
        CORE_RADIUS + self.ring as f32 * RING_WIDTH
    }

    /// Sample position in working pixel space, at the sector's middle radius
    /// and middle angle.
    pub fn sample_point(&self) -> Vec2 {
        let radius = self.inner_radius() + RING_WIDTH * 0.5;
        let angle = (self.index as f32 + 0.5) * TAU / self.count as f32;

        Vec2::splat(RADIUS as f32) + Vec2::from_angle(angle) * radius
    }

    /// Pixel containing the sample position.
    pub fn sample_pixel(&self) -> (u32, u32) {
        let point = self.sample_point();
        (point.x.floor() as u32, point.y.floor() as u32)
    }
}

/// All sectors in symbol order: rings from the core outward, angles
/// counter-clockwise from the positive X axis.
#[derive(Debug, Clone)]
pub struct CodeLayout {
    ring_offsets: Vec<usize>,
    sectors: Vec<Sector>,
}

impl Default for CodeLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeLayout {
    pub fn new() -> Self {
        let mut ring_offsets = Vec::with_capacity(RING_COUNT);
        let mut sectors = Vec::new();

        for ring in 0..RING_COUNT {
            let middle = CORE_RADIUS + (ring as f32 + 0.5) * RING_WIDTH;
            let count = (TAU * middle / SECTOR_ARC).floor() as usize;

            ring_offsets.push(sectors.len());
            sectors.extend((0..count).map(|index| Sector { ring, index, count }));
        }

        Self {
            ring_offsets,
            sectors,
        }
    }

    #[inline]
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    #[inline]
    pub fn symbol_count(&self) -> usize {
        self.sectors.len()
    }

    /// Largest payload in bytes.
    pub fn capacity(&self) -> usize {
        ((self.symbol_count() - HEADER_SYMBOLS) / SYMBOLS_PER_BYTE).min(MAX_BYTE_COUNT)
    }

    /// Symbol index of the sector covering a point in working pixel space.
    pub fn locate(&self, point: Vec2) -> Option<usize> {
        let offset = point - Vec2::splat(RADIUS as f32);
        let distance = offset.length();
        if distance < CORE_RADIUS {
            return None;
        }

        let ring = ((distance - CORE_RADIUS) / RING_WIDTH) as usize;
        let start = *self.ring_offsets.get(ring)?;
        let count = self.sectors[start].count;
        let angle = offset.y.atan2(offset.x).rem_euclid(TAU);
        let index = ((angle / TAU * count as f32) as usize).min(count - 1);

        Some(start + index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fits_working_radius() {
        let layout = CodeLayout::new();
        let outer = CORE_RADIUS + RING_COUNT as f32 * RING_WIDTH;

        assert!(outer < RADIUS as f32);
        assert!(layout.capacity() >= 256);
        assert!(layout.sectors().iter().all(|s| {
            let (x, y) = s.sample_pixel();
            x < SIZE && y < SIZE
        }));
    }

    #[test]
    fn test_sample_pixels_locate_their_sector() {
        let layout = CodeLayout::new();

        for (symbol, sector) in layout.sectors().iter().enumerate() {
            let (x, y) = sector.sample_pixel();
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            assert_eq!(layout.locate(center), Some(symbol));
        }
    }

    #[test]
    fn test_quad_matching() {
        for (symbol, color) in QUAD_COLORS.iter().enumerate() {
            assert_eq!(match_quad(color), Some(symbol as u8));
        }
        assert_eq!(match_quad(&Rgba([0, 255, 0, 255])), None);
        assert_eq!(match_quad(&BACKGROUND_COLOR), None);
        assert_eq!(match_quad(&Rgba([30, 35, 55, 255])), Some(0));
    }

    #[test]
    fn test_checksum() {
        assert_eq!(checksum(&[]), 0);
        // CRC-8/SMBUS check value
        assert_eq!(checksum(b"123456789"), 0xF4);
        assert_ne!(checksum(&[1, 2, 3]), checksum(&[1, 2, 7]));
    }
}
