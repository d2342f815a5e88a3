//! Pattern layers.
//!
//! A pattern is a stack of layers, each contributing one texture feature
//! (spots, stripes, a dorsal ridge). Every layer carries a palette index, an
//! orientation plane and a small fixed set of byte traits.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::codec::{ByteBuffer, FormatError};
use crate::compute::GenomeRng;

/// Number of palette entries a layer may reference.
pub const PALETTE_SIZE: u8 = 16;

/// Orientation of a layer's texture space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal of the sampling plane.
    pub normal: Vec3,
}

impl Plane {
    /// Size of a serialized plane in bytes.
    pub const SIZE: usize = 12;

    /// Create a plane, normalizing the given vector.
    ///
    /// Degenerate vectors fall back to the Y axis.
    pub fn new(normal: Vec3) -> Self {
        Self {
            normal: normal.try_normalize().unwrap_or(Vec3::Y),
        }
    }

    /// Plane with a uniformly random orientation.
    pub fn random(rng: &mut GenomeRng) -> Self {
        Self::new(rng.unit_vector3())
    }

    /// Check whether the normal is (approximately) unit length.
    pub fn is_normal(&self) -> bool {
        self.normal.is_finite() && (self.normal.length() - 1.0).abs() < 0.01
    }

    /// Interpolate towards another plane.
    ///
    /// Opposite normals have no defined midpoint, in that case this plane is
    /// kept.
    pub fn interpolate(&self, other: &Plane, t: f32) -> Plane {
        match self.normal.lerp(other.normal, t).try_normalize() {
            Some(normal) => Plane { normal },
            None => *self,
        }
    }

    pub fn serialize(&self, buffer: &mut ByteBuffer) {
        buffer.write_f32(self.normal.x);
        buffer.write_f32(self.normal.y);
        buffer.write_f32(self.normal.z);
    }

    pub fn deserialize(buffer: &mut ByteBuffer) -> Result<Self, FormatError> {
        let plane = Plane {
            normal: Vec3::new(buffer.read_f32()?, buffer.read_f32()?, buffer.read_f32()?),
        };

        if !plane.is_normal() {
            return Err(FormatError::PlaneNotNormal);
        }

        Ok(plane)
    }
}

/// Layer kind tag, also the on-wire identifier and the canonical layer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LayerKind {
    Spots = 0,
    Stripes = 1,
    Ridge = 2,
}

impl LayerKind {
    /// Number of distinct layer kinds, the maximum layer count of a genome.
    pub const COUNT: usize = 3;

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(LayerKind::Spots),
            1 => Some(LayerKind::Stripes),
            2 => Some(LayerKind::Ridge),
            _ => None,
        }
    }

    /// Number of byte traits carried by layers of this kind.
    pub fn trait_count(self) -> usize {
        match self {
            LayerKind::Spots => 6,
            LayerKind::Stripes => 6,
            LayerKind::Ridge => 5,
        }
    }
}

/// Spot field layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpots {
    pub palette_index: u8,
    pub plane: Plane,
    pub scale: u8,
    pub stretch: u8,
    pub threshold: u8,
    pub x_focus: u8,
    pub y_focus: u8,
    pub power: u8,
}

/// Stripe layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStripes {
    pub palette_index: u8,
    pub plane: Plane,
    pub scale: u8,
    pub distortion: u8,
    pub roughness: u8,
    pub threshold: u8,
    pub slant: u8,
    pub suppression: u8,
}

/// Dorsal ridge layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRidge {
    pub palette_index: u8,
    pub plane: Plane,
    pub scale: u8,
    pub power: u8,
    pub threshold: u8,
    pub focus: u8,
    pub focus_power: u8,
}

/// One genetic contribution to the visible pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatternLayer {
    Spots(LayerSpots),
    Stripes(LayerStripes),
    Ridge(LayerRidge),
}

impl PatternLayer {
    pub fn kind(&self) -> LayerKind {
        match self {
            PatternLayer::Spots(_) => LayerKind::Spots,
            PatternLayer::Stripes(_) => LayerKind::Stripes,
            PatternLayer::Ridge(_) => LayerKind::Ridge,
        }
    }

    pub fn palette_index(&self) -> u8 {
        match self {
            PatternLayer::Spots(l) => l.palette_index,
            PatternLayer::Stripes(l) => l.palette_index,
            PatternLayer::Ridge(l) => l.palette_index,
        }
    }

    pub fn plane(&self) -> &Plane {
        match self {
            PatternLayer::Spots(l) => &l.plane,
            PatternLayer::Stripes(l) => &l.plane,
            PatternLayer::Ridge(l) => &l.plane,
        }
    }

    pub fn plane_mut(&mut self) -> &mut Plane {
        match self {
            PatternLayer::Spots(l) => &mut l.plane,
            PatternLayer::Stripes(l) => &mut l.plane,
            PatternLayer::Ridge(l) => &mut l.plane,
        }
    }

    /// Byte traits in serialization order.
    pub fn traits(&self) -> Vec<u8> {
        match self {
            PatternLayer::Spots(l) => {
                vec![l.scale, l.stretch, l.threshold, l.x_focus, l.y_focus, l.power]
            }
            PatternLayer::Stripes(l) => vec![
                l.scale,
                l.distortion,
                l.roughness,
                l.threshold,
                l.slant,
                l.suppression,
            ],
            PatternLayer::Ridge(l) => vec![l.scale, l.power, l.threshold, l.focus, l.focus_power],
        }
    }

    /// Mutable byte traits in serialization order.
    pub fn traits_mut(&mut self) -> Vec<&mut u8> {
        match self {
            PatternLayer::Spots(l) => vec![
                &mut l.scale,
                &mut l.stretch,
                &mut l.threshold,
                &mut l.x_focus,
                &mut l.y_focus,
                &mut l.power,
            ],
            PatternLayer::Stripes(l) => vec![
                &mut l.scale,
                &mut l.distortion,
                &mut l.roughness,
                &mut l.threshold,
                &mut l.slant,
                &mut l.suppression,
            ],
            PatternLayer::Ridge(l) => vec![
                &mut l.scale,
                &mut l.power,
                &mut l.threshold,
                &mut l.focus,
                &mut l.focus_power,
            ],
        }
    }

    /// Serialized size in bytes, including the kind tag.
    pub fn serialized_len(&self) -> usize {
        2 + Plane::SIZE + self.kind().trait_count()
    }

    /// Write kind tag, palette index, plane and traits.
    pub fn serialize(&self, buffer: &mut ByteBuffer) {
        buffer.write_u8(self.kind() as u8);
        buffer.write_u8(self.palette_index());
        self.plane().serialize(buffer);

        for value in self.traits() {
            buffer.write_u8(value);
        }
    }

    /// Read a layer, starting at its kind tag.
    pub fn deserialize(buffer: &mut ByteBuffer) -> Result<Self, FormatError> {
        let tag = buffer.read_u8()?;
        let kind = LayerKind::from_u8(tag).ok_or(FormatError::UnknownLayerKind(tag))?;
        let palette_index = buffer.read_u8()?;

        if palette_index >= PALETTE_SIZE {
            return Err(FormatError::PaletteIndex(palette_index));
        }

        let plane = Plane::deserialize(buffer)?;

        Ok(match kind {
            LayerKind::Spots => PatternLayer::Spots(LayerSpots {
                palette_index,
                plane,
                scale: buffer.read_u8()?,
                stretch: buffer.read_u8()?,
                threshold: buffer.read_u8()?,
                x_focus: buffer.read_u8()?,
                y_focus: buffer.read_u8()?,
                power: buffer.read_u8()?,
            }),
            LayerKind::Stripes => PatternLayer::Stripes(LayerStripes {
                palette_index,
                plane,
                scale: buffer.read_u8()?,
                distortion: buffer.read_u8()?,
                roughness: buffer.read_u8()?,
                threshold: buffer.read_u8()?,
                slant: buffer.read_u8()?,
                suppression: buffer.read_u8()?,
            }),
            LayerKind::Ridge => PatternLayer::Ridge(LayerRidge {
                palette_index,
                plane,
                scale: buffer.read_u8()?,
                power: buffer.read_u8()?,
                threshold: buffer.read_u8()?,
                focus: buffer.read_u8()?,
                focus_power: buffer.read_u8()?,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ridge() -> PatternLayer {
        PatternLayer::Ridge(LayerRidge {
            palette_index: 3,
            plane: Plane::new(Vec3::new(0.2, 1.0, -0.4)),
            scale: 10,
            power: 20,
            threshold: 30,
            focus: 40,
            focus_power: 50,
        })
    }

    #[test]
    fn test_layer_roundtrip() {
        let layer = ridge();
        let mut buffer = ByteBuffer::new();
        layer.serialize(&mut buffer);
        assert_eq!(buffer.len(), layer.serialized_len());

        let mut reader = ByteBuffer::from_bytes(buffer.into_bytes());
        assert_eq!(PatternLayer::deserialize(&mut reader).unwrap(), layer);
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let mut reader = ByteBuffer::from_bytes(vec![9, 0]);
        assert_eq!(
            PatternLayer::deserialize(&mut reader),
            Err(FormatError::UnknownLayerKind(9))
        );
    }

    #[test]
    fn test_rejects_palette_index() {
        let mut buffer = ByteBuffer::new();
        ridge().serialize(&mut buffer);
        let mut bytes = buffer.into_bytes();
        bytes[1] = PALETTE_SIZE;

        let mut reader = ByteBuffer::from_bytes(bytes);
        assert_eq!(
            PatternLayer::deserialize(&mut reader),
            Err(FormatError::PaletteIndex(PALETTE_SIZE))
        );
    }

    #[test]
    fn test_rejects_non_normal_plane() {
        let mut buffer = ByteBuffer::new();
        buffer.write_f32(2.0);
        buffer.write_f32(0.0);
        buffer.write_f32(0.0);

        let mut reader = ByteBuffer::from_bytes(buffer.into_bytes());
        assert_eq!(
            Plane::deserialize(&mut reader),
            Err(FormatError::PlaneNotNormal)
        );
    }

    #[test]
    fn test_plane_interpolation() {
        let a = Plane::new(Vec3::X);
        let b = Plane::new(Vec3::Y);

        let mid = a.interpolate(&b, 0.5);
        assert!(mid.is_normal());
        assert!((mid.normal.x - mid.normal.y).abs() < 1e-6);
        assert_eq!(a.interpolate(&b, 0.0), a);

        // Opposite normals keep the first plane
        let c = Plane::new(-Vec3::X);
        assert_eq!(a.interpolate(&c, 0.5), a);
    }

    #[test]
    fn test_traits_mut_matches_traits() {
        let mut layer = ridge();
        for value in layer.traits_mut() {
            *value = value.saturating_add(1);
        }
        assert_eq!(layer.traits(), vec![11, 21, 31, 41, 51]);
    }
}
