//! Placed tokens, in stacking order (later = drawn on top).

use tracing::warn;

use crate::model::{GridPoint, GridSize, Token, TokenDraft, TokenPatch};
use crate::util::new_token_id;

/// Clamp an anchor so a `size` x `size` footprint stays on the grid.
pub fn clamp_anchor(x: i32, y: i32, size: u32, grid: GridSize) -> (u32, u32) {
    let max_x = grid.width.saturating_sub(size) as i64;
    let max_y = grid.height.saturating_sub(size) as i64;
    (
        (x as i64).clamp(0, max_x) as u32,
        (y as i64).clamp(0, max_y) as u32,
    )
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStore {
    tokens: Vec<Token>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Top-most token whose footprint covers `cell`.
    pub fn token_at(&self, cell: GridPoint) -> Option<&Token> {
        self.tokens.iter().rev().find(|t| t.covers(cell))
    }

    /// Name for the next token cut from the `base` template: "Undead 1",
    /// "Undead 2", ...
    pub fn numbered_name(&self, base: &str) -> String {
        let prefix = format!("{base} ");
        let existing = self
            .tokens
            .iter()
            .filter(|t| t.name == base || t.name.starts_with(&prefix))
            .count();
        format!("{base} {}", existing + 1)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = new_token_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    pub fn add(&mut self, draft: TokenDraft, grid: GridSize) -> Token {
        let size = draft.size.max(1);
        let (x, y) = clamp_anchor(draft.x, draft.y, size, grid);
        let name = if draft.numbered {
            self.numbered_name(&draft.name)
        } else {
            draft.name
        };
        let token = Token {
            id: self.fresh_id(),
            x,
            y,
            size,
            color: draft.color,
            icon: draft.icon,
            name,
            kind: draft.kind,
        };
        self.tokens.push(token.clone());
        token
    }

    /// Move a token, clamped into the grid. Unknown ids are ignored.
    pub fn move_to(&mut self, id: &str, x: i32, y: i32, grid: GridSize) -> bool {
        let Some(token) = self.tokens.iter_mut().find(|t| t.id == id) else {
            warn!(token_id = id, "move_to: no such token");
            return false;
        };
        let (nx, ny) = clamp_anchor(x, y, token.size, grid);
        if (nx, ny) == (token.x, token.y) {
            return false;
        }
        token.x = nx;
        token.y = ny;
        true
    }

    /// Merge `patch` into the token. The id never changes; the position is
    /// re-clamped because a larger size can push the footprint off the grid.
    pub fn update(&mut self, id: &str, patch: TokenPatch, grid: GridSize) -> bool {
        let Some(token) = self.tokens.iter_mut().find(|t| t.id == id) else {
            warn!(token_id = id, "update: no such token");
            return false;
        };
        let before = token.clone();
        let TokenPatch {
            x,
            y,
            size,
            color,
            icon,
            name,
        } = patch;
        if let Some(size) = size {
            token.size = size.max(1);
        }
        if let Some(color) = color {
            token.color = color;
        }
        if let Some(icon) = icon {
            token.icon = icon;
        }
        if let Some(name) = name {
            token.name = name;
        }
        let want_x = x.unwrap_or(token.x as i32);
        let want_y = y.unwrap_or(token.y as i32);
        let (nx, ny) = clamp_anchor(want_x, want_y, token.size, grid);
        token.x = nx;
        token.y = ny;
        *token != before
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t.id != id);
        if self.tokens.len() == before {
            warn!(token_id = id, "remove: no such token");
            return false;
        }
        true
    }

    /// Re-apply the placement bounds after the grid changed size.
    pub fn clamp_all(&mut self, grid: GridSize) -> bool {
        let mut changed = false;
        for token in &mut self.tokens {
            let (x, y) = clamp_anchor(token.x as i32, token.y as i32, token.size, grid);
            if (x, y) != (token.x, token.y) {
                token.x = x;
                token.y = y;
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TokenKind;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn grid() -> GridSize {
        GridSize::new(20, 15)
    }

    fn undead() -> TokenDraft {
        TokenDraft::new("Undead", TokenKind::Monster, "Skull").numbered()
    }

    #[test]
    fn add_assigns_unique_ids_and_keeps_order() {
        let mut store = TokenStore::new();
        let a = store.add(undead().at(1, 1), grid());
        let b = store.add(undead().at(2, 2), grid());
        assert_ne!(a.id, b.id);
        let names: Vec<_> = store.as_slice().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Undead 1", "Undead 2"]);
    }

    #[test]
    fn numbering_counts_only_matching_names() {
        let mut store = TokenStore::new();
        store.add(TokenDraft::new("Undead", TokenKind::Monster, "Skull"), grid());
        store.add(TokenDraft::new("Undead Lord", TokenKind::Monster, "Skull"), grid());
        store.add(TokenDraft::new("Undeadly", TokenKind::Monster, "Skull"), grid());
        assert_eq!(store.numbered_name("Undead"), "Undead 3");
        let t = store.add(undead(), grid());
        assert_eq!(t.name, "Undead 3");
    }

    #[test]
    fn add_clamps_placement() {
        let mut store = TokenStore::new();
        let t = store.add(undead().at(-4, 99).sized(3), grid());
        assert_eq!((t.x, t.y), (0, 12));
        let zero = store.add(undead().sized(0), grid());
        assert_eq!(zero.size, 1);
    }

    #[test]
    fn oversized_token_pins_to_origin() {
        let g = GridSize::new(2, 2);
        assert_eq!(clamp_anchor(5, 5, 3, g), (0, 0));
    }

    #[test]
    fn move_clamps_and_ignores_unknown_ids() {
        let mut store = TokenStore::new();
        let t = store.add(undead().sized(2), grid());
        assert!(store.move_to(&t.id, 50, 7, grid()));
        let moved = store.get(&t.id).unwrap();
        assert_eq!((moved.x, moved.y), (18, 7));
        assert!(!store.move_to(&t.id, 18, 7, grid()));
        assert!(!store.move_to("missing", 1, 1, grid()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_merges_and_keeps_identity() {
        let mut store = TokenStore::new();
        let t = store.add(undead().at(19, 14), grid());
        let patch = TokenPatch {
            name: Some("Lich".into()),
            size: Some(3),
            ..TokenPatch::default()
        };
        assert!(store.update(&t.id, patch, grid()));
        let updated = store.get(&t.id).unwrap();
        assert_eq!(updated.id, t.id);
        assert_eq!(updated.name, "Lich");
        assert_eq!(updated.icon, "Skull");
        assert_eq!((updated.x, updated.y, updated.size), (17, 12, 3));
        assert!(!store.update(&t.id, TokenPatch::default(), grid()));
        assert!(!store.update("nope", TokenPatch::default(), grid()));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = TokenStore::new();
        let t = store.add(undead(), grid());
        assert!(store.remove(&t.id));
        assert!(!store.remove(&t.id));
        assert!(store.is_empty());
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let mut store = TokenStore::new();
        let big = store.add(undead().at(0, 0).sized(3), grid());
        let small = store.add(undead().at(1, 1), grid());
        assert_eq!(store.token_at(GridPoint::new(1, 1)).unwrap().id, small.id);
        assert_eq!(store.token_at(GridPoint::new(2, 2)).unwrap().id, big.id);
        assert!(store.token_at(GridPoint::new(5, 5)).is_none());
    }

    #[test]
    fn shrinking_grid_reclamps_everything() {
        let mut store = TokenStore::new();
        store.add(undead().at(18, 13).sized(2), grid());
        assert!(store.clamp_all(GridSize::new(10, 10)));
        let t = &store.as_slice()[0];
        assert_eq!((t.x, t.y), (8, 8));
    }

    proptest! {
        #[test]
        fn placement_always_in_bounds(
            w in 1u32..60,
            h in 1u32..60,
            size in 0u32..8,
            moves in proptest::collection::vec(
                (-100i32..100, -100i32..100, proptest::option::of(0u32..8)),
                1..12,
            ),
        ) {
            let g = GridSize::new(w, h);
            let mut store = TokenStore::new();
            let t = store.add(undead().sized(size), g);
            for (x, y, resize) in moves {
                store.move_to(&t.id, x, y, g);
                if let Some(s) = resize {
                    store.update(&t.id, TokenPatch { size: Some(s), ..TokenPatch::default() }, g);
                }
                let cur = store.get(&t.id).unwrap();
                prop_assert!(cur.x <= g.width.saturating_sub(cur.size));
                prop_assert!(cur.y <= g.height.saturating_sub(cur.size));
            }
        }
    }
}
