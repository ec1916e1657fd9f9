// Player-view projection of the token list.
use super::fog::FogGrid;
use crate::model::Token;

/// GM sees every token. Players see a token only when its anchor cell is
/// revealed; the rest of a multi-cell footprint is not consulted.
pub fn visible_tokens<'a>(
    tokens: &'a [Token],
    fog: &FogGrid,
    is_player_view: bool,
) -> Vec<&'a Token> {
    if !is_player_view {
        return tokens.iter().collect();
    }
    tokens
        .iter()
        .filter(|t| fog.is_revealed(t.x as i32, t.y as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GridPoint, GridSize, TokenKind};

    fn token_at(id: &str, x: u32, y: u32, size: u32) -> Token {
        Token {
            id: id.into(),
            x,
            y,
            size,
            color: "red".into(),
            icon: "Skull".into(),
            name: id.into(),
            kind: TokenKind::Monster,
        }
    }

    #[test]
    fn player_view_follows_fog() {
        let tokens = vec![token_at("a", 2, 2, 1)];
        let fog = FogGrid::new(GridSize::new(6, 6), false);
        assert!(visible_tokens(&tokens, &fog, true).is_empty());
        assert_eq!(visible_tokens(&tokens, &fog, false).len(), 1);

        let fog = fog.paint_circle(GridPoint::new(2, 2), 0, true).unwrap();
        let seen = visible_tokens(&tokens, &fog, true);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].id, "a");
    }

    #[test]
    fn only_the_anchor_cell_counts() {
        let tokens = vec![token_at("big", 1, 1, 3)];
        let fog = FogGrid::new(GridSize::new(6, 6), false)
            .paint_circle(GridPoint::new(2, 2), 0, true)
            .unwrap();
        assert!(visible_tokens(&tokens, &fog, true).is_empty());
    }

    #[test]
    fn keeps_stacking_order() {
        let tokens = vec![token_at("a", 0, 0, 1), token_at("b", 1, 0, 1), token_at("c", 5, 5, 1)];
        let fog = FogGrid::new(GridSize::new(6, 6), false)
            .paint_circle(GridPoint::new(0, 0), 1, true)
            .unwrap();
        let ids: Vec<_> = visible_tokens(&tokens, &fog, true)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
