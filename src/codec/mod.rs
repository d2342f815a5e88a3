//! Binary and visual encodings of genomes.
//!
//! Genomes serialize through [`ByteBuffer`] into a compact byte string. That
//! string can additionally be painted as a radial visual code: a square image
//! of concentric rings, each split into sectors holding one 2 bit symbol drawn
//! as one of four quad colors.
//!
//! # Visual code format
//!
//! ```text
//! Canvas: 512 x 512 working pixels (other square sizes are rescaled)
//! Core:   solid disc, radius 40
//! Rings:  17 rings of width 12 around the core
//!         ring r holds floor(2 * pi * r_mid / 12) sectors
//!         symbols run ring by ring outward, counter-clockwise from +X
//!
//! Symbols (2 bits each, least significant pair first):
//!   0..5    Byte count: u10
//!   5..9    Checksum: CRC-8, polynomial 0x07
//!   9..     Payload: 4 symbols per byte
//!   rest    Filler: symbol index mod 4
//!
//! Quads (RGBA, matched within distance 0.2):
//!   0  navy        (0.10, 0.12, 0.20, 1)
//!   1  red-orange  (0.90, 0.35, 0.20, 1)
//!   2  cream       (0.95, 0.90, 0.75, 1)
//!   3  teal        (0.20, 0.65, 0.60, 1)
//! ```

mod buffer;
mod layout;
mod reader;
mod writer;

pub use buffer::{ByteBuffer, FormatError};
pub use layout::{
    CodeLayout, HEADER_SYMBOLS, QUAD_COLORS, RADIUS, SIZE, Sector, TOLERANCE, checksum,
    color_distance, match_quad,
};
pub use reader::{decode, decode_bytes, decode_image};
pub use writer::{CodeError, encode, encode_bytes, paint, quad_color, symbols};
