//! Decoding visual codes back into genomes.
//!
//! Decoding never fails loudly: any image that is not a well-formed code
//! yields `None`, with the reason logged at debug level.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use super::layout::{
    COUNT_SYMBOLS, CodeLayout, HEADER_SYMBOLS, SIZE, SYMBOLS_PER_BYTE, checksum, match_quad,
};
use crate::schema::Genome;

/// Read every sector's symbol, rescaling to working resolution first.
fn read_symbols(layout: &CodeLayout, image: &RgbaImage) -> Option<Vec<u8>> {
    let (width, height) = image.dimensions();
    if width != height || width == 0 {
        log::debug!("Rejecting {}x{} image: codes are square", width, height);
        return None;
    }

    let resized;
    let image = if width != SIZE {
        resized = imageops::resize(image, SIZE, SIZE, FilterType::Triangle);
        &resized
    } else {
        image
    };

    layout
        .sectors()
        .iter()
        .enumerate()
        .map(|(symbol, sector)| {
            let (x, y) = sector.sample_pixel();
            let color = image.get_pixel(x, y);
            let matched = match_quad(color);
            if matched.is_none() {
                log::debug!("Sector {} sampled {:?}, matching no quad", symbol, color.0);
            }
            matched
        })
        .collect()
}

/// Combine consecutive 2 bit symbols, least significant first.
fn pack(symbols: &[u8]) -> u16 {
    symbols
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &s)| acc | ((s as u16) << (2 * i)))
}

/// Decode the raw payload bytes of a visual code.
pub fn decode_bytes(image: &RgbaImage) -> Option<Vec<u8>> {
    let layout = CodeLayout::new();
    let symbols = read_symbols(&layout, image)?;

    let count = pack(&symbols[..COUNT_SYMBOLS]) as usize;
    if count > layout.capacity() {
        log::debug!("Byte count {} exceeds capacity {}", count, layout.capacity());
        return None;
    }
    let expected = pack(&symbols[COUNT_SYMBOLS..HEADER_SYMBOLS]) as u8;

    let bytes: Vec<u8> = symbols[HEADER_SYMBOLS..HEADER_SYMBOLS + count * SYMBOLS_PER_BYTE]
        .chunks_exact(SYMBOLS_PER_BYTE)
        .map(|chunk| pack(chunk) as u8)
        .collect();

    let actual = checksum(&bytes);
    if actual != expected {
        log::debug!("Checksum mismatch: stored {:#04x}, computed {:#04x}", expected, actual);
        return None;
    }

    Some(bytes)
}

/// Decode a genome from a visual code.
pub fn decode(image: &RgbaImage) -> Option<Genome> {
    let bytes = decode_bytes(image)?;

    match Genome::from_bytes(bytes) {
        Ok(genome) => Some(genome),
        Err(err) => {
            log::debug!("Code payload is not a genome: {}", err);
            None
        }
    }
}

/// Decode a genome from an image of any pixel format.
pub fn decode_image(image: &DynamicImage) -> Option<Genome> {
    decode(&image.to_rgba8())
}
