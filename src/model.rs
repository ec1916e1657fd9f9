//! Core data types for the battle map.
//! Grid-space values are integer cells; screen-space values are pixels relative
//! to the map container.

use serde::{Deserialize, Serialize};

/// Side of one grid cell in pixels at scale 1.
pub const CELL_SIZE_PX: f64 = 40.0;
pub const MIN_SCALE: f64 = 0.2;
pub const MAX_SCALE: f64 = 5.0;
/// Largest footprint the token editor offers.
pub const MAX_TOKEN_SIZE: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Grid needed to cover an image of the given pixel size.
    pub fn covering(width_px: u32, height_px: u32, cell_size_px: f64) -> Self {
        let cell = if cell_size_px.is_finite() && cell_size_px >= 1.0 {
            cell_size_px
        } else {
            CELL_SIZE_PX
        };
        let w = (width_px as f64 / cell).ceil() as u32;
        let h = (height_px as f64 / cell).ceil() as u32;
        Self::new(w, h)
    }

    pub fn contains(&self, cell: GridPoint) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A grid cell address. Signed so that pointer positions left of / above the
/// map survive the transform and can be clamped afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A position in screen pixels (or a pixel delta).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const ORIGIN: ScreenPoint = ScreenPoint { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Token category, taken from the library template's `tokenType`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Player,
    Monster,
    Item,
    Other(String),
}

impl TokenKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "player" | "npc" => TokenKind::Player,
            "monster" => TokenKind::Monster,
            "item" => TokenKind::Item,
            _ => TokenKind::Other(raw.trim().to_string()),
        }
    }

    pub fn default_color(&self) -> &'static str {
        match self {
            TokenKind::Player => TOKEN_COLORS[3].1,
            TokenKind::Monster => TOKEN_COLORS[4].1,
            TokenKind::Item => TOKEN_COLORS[5].1,
            TokenKind::Other(_) => TOKEN_COLORS[0].1,
        }
    }
}

/// Palette offered by the token editor: (label, css color).
pub const TOKEN_COLORS: [(&str, &str); 6] = [
    ("Accent", "#2ea8ff"),
    ("Destructive", "#f85149"),
    ("Primary", "#a371f7"),
    ("Player Blue", "hsl(207, 98%, 48%)"),
    ("Monster Red", "hsl(0, 84%, 60%)"),
    ("Item Purple", "hsl(277, 79%, 31%)"),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Unique within the session; never changes once assigned.
    pub id: String,
    /// Anchor (top-left) column.
    pub x: u32,
    /// Anchor (top-left) row.
    pub y: u32,
    /// Footprint is `size` x `size` cells; always >= 1.
    pub size: u32,
    pub color: String,
    /// Icon reference, resolved at render time by an `IconResolver`.
    pub icon: String,
    pub name: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn anchor(&self) -> GridPoint {
        GridPoint::new(self.x as i32, self.y as i32)
    }

    /// True if the token's footprint covers `cell`.
    pub fn covers(&self, cell: GridPoint) -> bool {
        let (x, y, s) = (self.x as i64, self.y as i64, self.size as i64);
        let (cx, cy) = (cell.x as i64, cell.y as i64);
        cx >= x && cx < x + s && cy >= y && cy < y + s
    }
}

/// Everything needed to place a new token; the store assigns the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenDraft {
    pub x: i32,
    pub y: i32,
    pub size: u32,
    pub color: String,
    pub icon: String,
    pub name: String,
    pub kind: TokenKind,
    /// Append " N" to the name, counting tokens that already share it.
    pub numbered: bool,
}

impl TokenDraft {
    pub fn new(name: impl Into<String>, kind: TokenKind, icon: impl Into<String>) -> Self {
        Self {
            x: 0,
            y: 0,
            size: 1,
            color: kind.default_color().to_string(),
            icon: icon.into(),
            name: name.into(),
            kind,
            numbered: false,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn sized(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }
}

/// Partial update merged into an existing token. `None` leaves a field as is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenPatch {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub size: Option<u32>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub name: Option<String>,
}

impl TokenPatch {
    pub fn is_empty(&self) -> bool {
        *self == TokenPatch::default()
    }
}

/// Background image handed over by the map import panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapImage {
    pub url: String,
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    Gm,
    Player,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushMode {
    Reveal,
    Hide,
}

impl BrushMode {
    pub fn reveals(self) -> bool {
        matches!(self, BrushMode::Reveal)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushSettings {
    pub active: bool,
    /// 1 paints a single cell; each step adds one cell of radius.
    pub size: u32,
    /// 0-100, GM overlay only. Players always see opaque fog.
    pub fog_opacity: u8,
}

impl BrushSettings {
    pub const MIN_SIZE: u32 = 1;
    pub const MAX_SIZE: u32 = 10;

    pub fn new(size: u32, fog_opacity: u8) -> Self {
        Self {
            active: false,
            size: size.clamp(Self::MIN_SIZE, Self::MAX_SIZE),
            fog_opacity: fog_opacity.min(100),
        }
    }
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self::new(3, 80)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covering_grid_rounds_up_partial_cells() {
        assert_eq!(GridSize::covering(1000, 810, 40.0), GridSize::new(25, 21));
        assert_eq!(GridSize::covering(0, 0, 40.0), GridSize::new(1, 1));
        assert_eq!(GridSize::covering(80, 80, 0.0), GridSize::new(2, 2));
    }

    #[test]
    fn contains_rejects_negative_and_overflowing_cells() {
        let g = GridSize::new(4, 3);
        assert!(g.contains(GridPoint::new(3, 2)));
        assert!(!g.contains(GridPoint::new(-1, 0)));
        assert!(!g.contains(GridPoint::new(4, 0)));
        assert!(!g.contains(GridPoint::new(0, 3)));
    }

    #[test]
    fn token_footprint() {
        let mut t = Token {
            id: "t".into(),
            x: 2,
            y: 3,
            size: 2,
            color: String::new(),
            icon: String::new(),
            name: String::new(),
            kind: TokenKind::Item,
        };
        assert!(t.covers(GridPoint::new(3, 4)));
        assert!(!t.covers(GridPoint::new(4, 4)));
        t.size = 1;
        assert!(!t.covers(GridPoint::new(3, 4)));
    }

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!(TokenKind::parse("Monster"), TokenKind::Monster);
        assert_eq!(TokenKind::parse(" item "), TokenKind::Item);
        assert_eq!(TokenKind::parse("trap"), TokenKind::Other("trap".into()));
    }

    #[test]
    fn brush_settings_are_clamped() {
        let b = BrushSettings::new(0, 250);
        assert_eq!(b.size, 1);
        assert_eq!(b.fog_opacity, 100);
        assert_eq!(BrushSettings::new(42, 10).size, BrushSettings::MAX_SIZE);
    }
}
