//! Icon references -> renderable glyphs.
//!
//! Tokens only store a reference string. Rendering goes through an
//! [`IconResolver`], which always yields something drawable.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Known(&'static str),
    Fallback,
}

impl Glyph {
    pub const FALLBACK_SYMBOL: &'static str = "?";

    pub fn symbol(self) -> &'static str {
        match self {
            Glyph::Known(s) => s,
            Glyph::Fallback => Self::FALLBACK_SYMBOL,
        }
    }
}

pub trait IconResolver {
    fn resolve(&self, reference: &str) -> Glyph;
}

/// Built-in table covering the library presets and token kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlyphTable;

const TABLE: &[(&str, &str)] = &[
    ("shield", "🛡"),
    ("skull", "💀"),
    ("ghost", "👻"),
    ("flame", "🔥"),
    ("swords", "⚔"),
    ("box", "📦"),
    ("gem", "💎"),
    ("users", "👥"),
    ("user", "👤"),
    ("venetianmask", "🎭"),
    ("shoppingbag", "👜"),
    ("player", "🛡"),
    ("monster", "👹"),
    ("item", "💎"),
    ("dragon-head", "🐉"),
    ("crossed-swords", "⚔"),
    ("treasure-map", "🗺"),
];

impl IconResolver for GlyphTable {
    fn resolve(&self, reference: &str) -> Glyph {
        // "game-icons:dragon-head" style references resolve by their name part
        let name = reference.rsplit(':').next().unwrap_or(reference).trim();
        if name.is_empty() {
            return Glyph::Fallback;
        }
        TABLE
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, glyph)| Glyph::Known(glyph))
            .unwrap_or(Glyph::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_library_names_case_insensitively() {
        assert_eq!(GlyphTable.resolve("Skull"), Glyph::Known("💀"));
        assert_eq!(GlyphTable.resolve("skull"), Glyph::Known("💀"));
        assert_eq!(GlyphTable.resolve("VenetianMask").symbol(), "🎭");
    }

    #[test]
    fn prefixed_references_use_name_part() {
        assert_eq!(GlyphTable.resolve("game-icons:dragon-head"), Glyph::Known("🐉"));
    }

    #[test]
    fn unknown_references_fall_back() {
        assert_eq!(GlyphTable.resolve("HelpCircle"), Glyph::Fallback);
        assert_eq!(GlyphTable.resolve(""), Glyph::Fallback);
        assert_eq!(GlyphTable.resolve("game-icons:"), Glyph::Fallback);
        assert_eq!(Glyph::Fallback.symbol(), "?");
    }
}
