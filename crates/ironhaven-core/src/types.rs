//! Core types shared between the world and game crates

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for anything spawned into the city (NPCs, crimes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build an ID from 16 bytes of caller-supplied entropy.
    ///
    /// Used by seeded chunk generation so regenerated NPCs keep their identity.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short form is enough for logs
        let s = self.0.simple().to_string();
        f.write_str(&s[..8])
    }
}

/// Packed 0xRRGGBB color, the form the renderer consumes directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const BLACK: Color = Color(0x000000);

    /// Create a color from a hex value (0xRRGGBB). Bits above 24 are dropped.
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00FF_FFFF)
    }

    pub fn r(&self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    pub fn g(&self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub fn b(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Normalized [r, g, b, 1.0]
    pub fn to_array(&self) -> [f32; 4] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
            1.0,
        ]
    }

    /// CSS-style `#rrggbb`
    pub fn to_css(&self) -> String {
        format!("#{:06x}", self.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_channels() {
        let color = Color::from_hex(0x8B4513);
        assert_eq!(color.r(), 0x8B);
        assert_eq!(color.g(), 0x45);
        assert_eq!(color.b(), 0x13);
        assert_eq!(color.to_css(), "#8b4513");
    }

    #[test]
    fn test_color_masks_high_bits() {
        assert_eq!(Color::from_hex(0xFF00_0000), Color::BLACK);
    }

    #[test]
    fn test_entity_id_seeded_is_stable() {
        let a = EntityId::from_bytes([7; 16]);
        let b = EntityId::from_bytes([7; 16]);
        assert_eq!(a, b);
        assert_ne!(EntityId::new(), EntityId::new());
    }
}
