//! Tag entity types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier for a tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    /// Creates a new time-ordered tag identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TagId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TagId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TagId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Label colour used on light tag backgrounds.
pub const DARK_LABEL: &str = "#000000";
/// Label colour used on dark tag backgrounds.
pub const LIGHT_LABEL: &str = "#ffffff";

/// A user-defined label that tasks can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique, immutable identifier.
    pub id: TagId,
    /// Display name, never blank for tags created through the store.
    pub name: String,
    /// Background colour as a CSS hex string (`#rgb` or `#rrggbb`).
    pub color: String,
}

impl Tag {
    /// Picks black or white label text for this tag's background colour.
    ///
    /// Uses YIQ perceived brightness with a threshold of 128. Colours that
    /// cannot be parsed fall back to [`DARK_LABEL`].
    #[must_use]
    pub fn label_color(&self) -> &'static str {
        match parse_hex_color(&self.color) {
            Some((r, g, b)) => {
                let yiq = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
                if yiq >= 128 { DARK_LABEL } else { LIGHT_LABEL }
            }
            None => DARK_LABEL,
        }
    }
}

/// Parses `#rgb` / `#rrggbb` (leading `#` optional) into RGB components.
fn parse_hex_color(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            // #abc expands to #aabbcc
            let expand = |s: &str| channel(s).map(|v| v * 17);
            Some((expand(&hex[0..1])?, expand(&hex[1..2])?, expand(&hex[2..3])?))
        }
        _ => None,
    }
}
