//! Encoding genomes as radial visual codes.

use glam::Vec2;
use image::{Rgba, RgbaImage};
use thiserror::Error;

use super::layout::{
    BACKGROUND_COLOR, CORE_COLOR, CORE_RADIUS, COUNT_SYMBOLS, CodeLayout, HEADER_SYMBOLS,
    QUAD_COLORS, SIZE, SYMBOLS_PER_BYTE, checksum,
};
use crate::schema::Genome;

/// Errors raised while encoding a visual code.
#[derive(Debug, Error)]
pub enum CodeError {
    #[error("Payload of {bytes} bytes exceeds code capacity of {capacity} bytes")]
    CapacityExceeded { bytes: usize, capacity: usize },
}

/// Symbol sequence for `bytes`: header, payload, then filler.
///
/// Filler sectors cycle through the quads by symbol index so that every
/// sector carries a decodable color.
pub fn symbols(layout: &CodeLayout, bytes: &[u8]) -> Result<Vec<u8>, CodeError> {
    let capacity = layout.capacity();
    if bytes.len() > capacity {
        return Err(CodeError::CapacityExceeded {
            bytes: bytes.len(),
            capacity,
        });
    }

    let mut symbols: Vec<u8> = (0..layout.symbol_count()).map(|i| (i % 4) as u8).collect();

    let count = bytes.len() as u16;
    for i in 0..COUNT_SYMBOLS {
        symbols[i] = ((count >> (2 * i)) & 3) as u8;
    }

    let crc = checksum(bytes);
    for i in 0..HEADER_SYMBOLS - COUNT_SYMBOLS {
        symbols[COUNT_SYMBOLS + i] = (crc >> (2 * i)) & 3;
    }

    for (index, byte) in bytes.iter().enumerate() {
        let start = HEADER_SYMBOLS + index * SYMBOLS_PER_BYTE;
        for i in 0..SYMBOLS_PER_BYTE {
            symbols[start + i] = (byte >> (2 * i)) & 3;
        }
    }

    Ok(symbols)
}

/// Paint a symbol sequence at working resolution.
///
/// Each pixel takes the color of the sector containing its center.
pub fn paint(layout: &CodeLayout, symbols: &[u8]) -> RgbaImage {
    RgbaImage::from_fn(SIZE, SIZE, |x, y| {
        let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

        match layout.locate(center) {
            Some(symbol) => symbols
                .get(symbol)
                .map(|&s| QUAD_COLORS[(s & 3) as usize])
                .unwrap_or(BACKGROUND_COLOR),
            None if center.distance(Vec2::splat(SIZE as f32 * 0.5)) < CORE_RADIUS => CORE_COLOR,
            None => BACKGROUND_COLOR,
        }
    })
}

/// Encode raw bytes as a visual code.
pub fn encode_bytes(bytes: &[u8]) -> Result<RgbaImage, CodeError> {
    let layout = CodeLayout::new();
    let symbols = symbols(&layout, bytes)?;

    Ok(paint(&layout, &symbols))
}

/// Encode a genome as a visual code.
pub fn encode(genome: &Genome) -> Result<RgbaImage, CodeError> {
    encode_bytes(&genome.to_bytes())
}

/// Color a sample pixel must carry for symbol `s`.
#[inline]
pub fn quad_color(symbol: u8) -> Rgba<u8> {
    QUAD_COLORS[(symbol & 3) as usize]
}
