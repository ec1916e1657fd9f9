//! The map session: one aggregate that owns grid, fog, tokens, viewport,
//! brush and gesture state, and through which every mutation is funnelled.
//!
//! A GM session is the only writer. The player view holds a mirror created
//! with [`MapSession::player_mirror`] and refreshed with
//! [`MapSession::sync_from`]; it keeps its own viewport and refuses every data
//! mutation.

use std::rc::Rc;

use tracing::{debug, info, warn};

use super::drag::{DragPayload, PayloadError};
use super::fog::{FogGrid, brush_radius};
use super::interaction::{Effect, Interaction, PointerButton, PointerContext};
use super::tokens::TokenStore;
use super::transform::screen_to_grid;
use super::viewport::{Viewport, wheel_delta};
use super::visibility::visible_tokens;
use crate::config::MapConfig;
use crate::model::{
    BrushSettings, GridPoint, GridSize, MapImage, ScreenPoint, SessionMode, Token,
    TokenDraft, TokenKind, TokenPatch,
};

/// Data operations offered to dialogs, panels and other collaborators.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    AddToken(TokenDraft),
    MoveToken { id: String, x: i32, y: i32 },
    UpdateToken { id: String, patch: TokenPatch },
    RemoveToken { id: String },
    PaintFog { center: GridPoint, radius: u32, reveal: bool },
    SetAllFog { revealed: bool },
    ZoomAt { point: ScreenPoint, delta: f64 },
    ZoomBy { point: ScreenPoint, factor: f64 },
    PanBy { dx: f64, dy: f64 },
    ResetView,
    LoadMap(MapImage),
    ClearMap,
    SetBrushActive(bool),
    SetBrushSize(u32),
    SetFogOpacity(u8),
}

impl SessionAction {
    /// Viewport-only actions are allowed on a player mirror.
    fn is_view_only(&self) -> bool {
        matches!(
            self,
            SessionAction::ZoomAt { .. }
                | SessionAction::ZoomBy { .. }
                | SessionAction::PanBy { .. }
                | SessionAction::ResetView
        )
    }
}

#[derive(Debug, Clone)]
pub struct MapSession {
    mode: SessionMode,
    config: MapConfig,
    image: Option<MapImage>,
    grid: GridSize,
    fog: Rc<FogGrid>,
    tokens: TokenStore,
    viewport: Viewport,
    brush: BrushSettings,
    interaction: Interaction,
}

impl MapSession {
    pub fn new_gm(config: MapConfig) -> Self {
        let grid = config.default_grid;
        let fog = Rc::new(FogGrid::new(grid, config.start_revealed));
        let brush = config.brush();
        info!(width = grid.width, height = grid.height, "gm session created");
        Self {
            mode: SessionMode::Gm,
            config,
            image: None,
            grid,
            fog,
            tokens: TokenStore::new(),
            viewport: Viewport::default(),
            brush,
            interaction: Interaction::Idle,
        }
    }

    /// Read-only copy for the player view. Shares the fog allocation.
    pub fn player_mirror(&self) -> Self {
        Self {
            mode: SessionMode::Player,
            config: self.config.clone(),
            image: self.image.clone(),
            grid: self.grid,
            fog: Rc::clone(&self.fog),
            tokens: self.tokens.clone(),
            viewport: Viewport::default(),
            brush: BrushSettings {
                active: false,
                ..self.brush
            },
            interaction: Interaction::Idle,
        }
    }

    /// Pull shared data (map, fog, tokens) from `source`, keeping this
    /// session's own viewport. Returns true if anything differed.
    pub fn sync_from(&mut self, source: &MapSession) -> bool {
        let changed = self.image != source.image
            || self.grid != source.grid
            || !Rc::ptr_eq(&self.fog, &source.fog)
            || self.tokens != source.tokens
            || self.brush.fog_opacity != source.brush.fog_opacity;
        if changed {
            self.image = source.image.clone();
            self.grid = source.grid;
            self.fog = Rc::clone(&source.fog);
            self.tokens = source.tokens.clone();
            self.brush.fog_opacity = source.brush.fog_opacity;
        }
        changed
    }

    /// Place the demo party on an empty map.
    pub fn seed_demo_tokens(&mut self) {
        if !self.is_gm() || !self.tokens.is_empty() {
            return;
        }
        let party = [
            ("Cyber-Ronin", TokenKind::Player, "Shield", 3, 4, 1),
            ("Net-Witch", TokenKind::Player, "Shield", 5, 5, 1),
            ("Security Drone", TokenKind::Monster, "Swords", 10, 8, 2),
            ("Alpha Construct", TokenKind::Monster, "Skull", 12, 2, 3),
            ("Data-Spike", TokenKind::Item, "Gem", 15, 12, 1),
        ];
        for (name, kind, icon, x, y, size) in party {
            let draft = TokenDraft::new(name, kind, icon).at(x, y).sized(size);
            self.tokens.add(draft, self.grid);
        }
        debug!(count = self.tokens.len(), "seeded demo tokens");
    }

    pub fn is_gm(&self) -> bool {
        self.mode == SessionMode::Gm
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn cell_size_px(&self) -> f64 {
        self.config.cell_size_px
    }

    pub fn image(&self) -> Option<&MapImage> {
        self.image.as_ref()
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn fog(&self) -> &Rc<FogGrid> {
        &self.fog
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Tokens this session's viewer may see.
    pub fn visible_tokens(&self) -> Vec<&Token> {
        visible_tokens(self.tokens.as_slice(), &self.fog, !self.is_gm())
    }

    pub fn cell_at(&self, point: ScreenPoint) -> GridPoint {
        screen_to_grid(point, &self.viewport, self.config.cell_size_px)
    }

    /// Token the GM may open for editing at `point`: none while the brush
    /// is armed, since right-drag then hides fog.
    pub fn editable_token_at(&self, point: ScreenPoint) -> Option<&Token> {
        if !self.is_gm() || self.brush.active {
            return None;
        }
        self.tokens.token_at(self.cell_at(point))
    }

    // ---------------- Pointer input -----------------

    /// Returns true when the surface needs a redraw.
    pub fn pointer_down(&mut self, button: PointerButton, point: ScreenPoint) -> bool {
        let ctx = PointerContext {
            mode: self.mode,
            brush_active: self.brush.active,
            viewport: &self.viewport,
            cell_size_px: self.config.cell_size_px,
        };
        let was_idle = self.interaction.is_idle();
        let effect = self.interaction.pointer_down(button, point, &ctx);
        let entered = was_idle != self.interaction.is_idle();
        self.apply_effect(effect) || entered
    }

    pub fn pointer_move(&mut self, point: ScreenPoint) -> bool {
        let ctx = PointerContext {
            mode: self.mode,
            brush_active: self.brush.active,
            viewport: &self.viewport,
            cell_size_px: self.config.cell_size_px,
        };
        let effect = self.interaction.pointer_move(point, &ctx);
        self.apply_effect(effect)
    }

    pub fn pointer_up(&mut self) -> bool {
        let was_idle = self.interaction.is_idle();
        self.interaction.pointer_up();
        was_idle != self.interaction.is_idle()
    }

    pub fn pointer_leave(&mut self) -> bool {
        let was_idle = self.interaction.is_idle();
        self.interaction.pointer_leave();
        !was_idle
    }

    /// Wheel zoom toward the cursor. Allowed in both modes: the viewport
    /// belongs to the surface, not to the shared map.
    pub fn wheel(&mut self, point: ScreenPoint, delta_y: f64) -> bool {
        let delta = wheel_delta(delta_y, self.config.wheel_sensitivity);
        self.viewport.zoom_at(point, delta)
    }

    /// The GM's right-button hide brush needs the native menu out of the way.
    pub fn suppresses_context_menu(&self) -> bool {
        self.is_gm() && (self.brush.active || self.interaction.painting_hide())
    }

    fn apply_effect(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::None => false,
            Effect::SetOffset(offset) => self.viewport.set_offset(offset),
            Effect::Paint { cell, mode } => {
                let radius = brush_radius(self.brush.size);
                self.paint(cell, radius, mode.reveals())
            }
        }
    }

    fn paint(&mut self, center: GridPoint, radius: u32, reveal: bool) -> bool {
        match self.fog.paint_circle(center, radius, reveal) {
            Some(next) => {
                self.fog = Rc::new(next);
                true
            }
            None => false,
        }
    }

    // ---------------- Drag and drop -----------------

    pub fn begin_token_drag(&mut self, id: &str) -> bool {
        if self.tokens.get(id).is_none() {
            warn!(token_id = id, "drag start on unknown token");
            return false;
        }
        let ctx = PointerContext {
            mode: self.mode,
            brush_active: self.brush.active,
            viewport: &self.viewport,
            cell_size_px: self.config.cell_size_px,
        };
        self.interaction.begin_token_drag(id, &ctx)
    }

    pub fn end_token_drag(&mut self) {
        self.interaction.end_token_drag();
    }

    /// Finish a drop at `point`: create a token from a library payload or move
    /// the dragged one. Bad payloads and player-side drops are ignored.
    pub fn drop_payload(
        &mut self,
        payload: Result<DragPayload, PayloadError>,
        point: ScreenPoint,
    ) -> Option<Token> {
        self.interaction.end_token_drag();
        if !self.is_gm() {
            return None;
        }
        let payload = match payload {
            Ok(p) => p,
            Err(err) => {
                debug!(%err, "ignoring drop");
                return None;
            }
        };
        let cell = self.cell_at(point);
        match payload {
            DragPayload::NewToken(template) => {
                let kind = TokenKind::parse(&template.token_type);
                let draft = TokenDraft::new(template.name, kind, template.icon)
                    .at(cell.x, cell.y)
                    .numbered();
                let token = self.tokens.add(draft, self.grid);
                debug!(token_id = %token.id, x = token.x, y = token.y, "token dropped");
                Some(token)
            }
            DragPayload::MoveToken { id } => {
                self.tokens.move_to(&id, cell.x, cell.y, self.grid);
                self.tokens.get(&id).cloned()
            }
        }
    }

    // ---------------- Map import -----------------

    /// Adopt a background image: the grid becomes the image size in cells,
    /// the fog is rebuilt and tokens are pulled back inside.
    pub fn load_map(&mut self, image: MapImage) -> bool {
        if !self.is_gm() {
            return false;
        }
        let grid = GridSize::covering(image.width_px, image.height_px, self.config.cell_size_px);
        debug!(url = %image.url, width = grid.width, height = grid.height, "map loaded");
        self.image = Some(image);
        self.resize_grid(grid);
        true
    }

    pub fn clear_map(&mut self) -> bool {
        if !self.is_gm() || self.image.is_none() {
            return false;
        }
        self.image = None;
        self.resize_grid(self.config.default_grid);
        true
    }

    fn resize_grid(&mut self, grid: GridSize) {
        self.grid = grid;
        self.fog = Rc::new(FogGrid::new(grid, self.config.start_revealed));
        self.tokens.clamp_all(grid);
        self.interaction = Interaction::Idle;
    }

    // ---------------- Collaborator funnel -----------------

    /// Apply a data operation. Returns true if the session changed.
    pub fn apply(&mut self, action: SessionAction) -> bool {
        if !self.is_gm() && !action.is_view_only() {
            warn!(?action, "player view cannot modify the map");
            return false;
        }
        let grid = self.grid;
        match action {
            SessionAction::AddToken(draft) => {
                self.tokens.add(draft, grid);
                true
            }
            SessionAction::MoveToken { id, x, y } => self.tokens.move_to(&id, x, y, grid),
            SessionAction::UpdateToken { id, patch } => self.tokens.update(&id, patch, grid),
            SessionAction::RemoveToken { id } => self.tokens.remove(&id),
            SessionAction::PaintFog {
                center,
                radius,
                reveal,
            } => self.paint(center, radius, reveal),
            SessionAction::SetAllFog { revealed } => match self.fog.filled(revealed) {
                Some(next) => {
                    self.fog = Rc::new(next);
                    true
                }
                None => false,
            },
            SessionAction::ZoomAt { point, delta } => self.viewport.zoom_at(point, delta),
            SessionAction::ZoomBy { point, factor } => self.viewport.zoom_by(point, factor),
            SessionAction::PanBy { dx, dy } => self.viewport.pan_by(dx, dy),
            SessionAction::ResetView => self.viewport.reset(),
            SessionAction::LoadMap(image) => self.load_map(image),
            SessionAction::ClearMap => self.clear_map(),
            SessionAction::SetBrushActive(active) => {
                let changed = self.brush.active != active;
                self.brush.active = active;
                if !active {
                    self.interaction.pointer_leave();
                }
                changed
            }
            SessionAction::SetBrushSize(size) => {
                let next = BrushSettings::new(size, self.brush.fog_opacity);
                let changed = next.size != self.brush.size;
                self.brush.size = next.size;
                self.config.brush_size = next.size;
                changed
            }
            SessionAction::SetFogOpacity(opacity) => {
                let opacity = opacity.min(100);
                let changed = opacity != self.brush.fog_opacity;
                self.brush.fog_opacity = opacity;
                self.config.fog_opacity = opacity;
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::drag::NewTokenPayload;
    use crate::state::transform::grid_to_screen;
    use pretty_assertions::assert_eq;

    fn gm() -> MapSession {
        MapSession::new_gm(MapConfig::default())
    }

    fn undead_drop() -> Result<DragPayload, PayloadError> {
        let raw = r#"{"type":"new-token","tokenType":"monster","icon":"skull","name":"Undead"}"#;
        DragPayload::decode(Some(raw), None)
    }

    fn centre_of(session: &MapSession, x: i32, y: i32) -> ScreenPoint {
        let cell = GridPoint::new(x, y);
        let corner = grid_to_screen(cell, session.viewport(), session.cell_size_px());
        ScreenPoint::new(corner.x + 5.0, corner.y + 5.0)
    }

    #[test]
    fn new_session_is_fully_fogged_default_grid() {
        let s = gm();
        assert_eq!(s.grid(), GridSize::new(30, 20));
        assert_eq!(s.fog().revealed_count(), 0);
        assert_eq!(s.fog().size(), s.grid());
        assert!(s.interaction().is_idle());
    }

    #[test]
    fn dropping_library_item_names_and_places_token() {
        let mut s = gm();
        let at = centre_of(&s, 10, 8);
        let t = s.drop_payload(undead_drop(), at).unwrap();
        assert_eq!((t.x, t.y, t.name.as_str()), (10, 8, "Undead 1"));
        assert_eq!(t.kind, TokenKind::Monster);
        assert_eq!(t.icon, "skull");
        let second = s.drop_payload(undead_drop(), at).unwrap();
        assert_eq!(second.name, "Undead 2");
        assert_eq!(s.tokens().len(), 2);
    }

    #[test]
    fn dropping_existing_token_moves_it() {
        let mut s = gm();
        s.seed_demo_tokens();
        let drone = s
            .tokens()
            .as_slice()
            .iter()
            .find(|t| t.name == "Security Drone")
            .cloned()
            .unwrap();
        assert!(s.begin_token_drag(&drone.id));
        let payload = DragPayload::decode(None, Some(&drone.id));
        let moved = s.drop_payload(payload, centre_of(&s, 29, 0)).unwrap();
        // 2x2 footprint: last legal column is 28
        assert_eq!((moved.x, moved.y), (28, 0));
        assert!(s.interaction().is_idle());
    }

    #[test]
    fn malformed_drop_is_ignored() {
        let mut s = gm();
        let bad = DragPayload::decode(Some("{oops"), None);
        assert!(s.drop_payload(bad, ScreenPoint::ORIGIN).is_none());
        let stale = DragPayload::decode(None, Some("token-gone"));
        assert!(s.drop_payload(stale, ScreenPoint::ORIGIN).is_none());
        assert!(s.tokens().is_empty());
    }

    #[test]
    fn drop_respects_pan_and_zoom() {
        let mut s = gm();
        s.apply(SessionAction::PanBy { dx: 100.0, dy: 50.0 });
        s.apply(SessionAction::ZoomBy {
            point: ScreenPoint::ORIGIN,
            factor: 2.0,
        });
        let at = centre_of(&s, 4, 3);
        let t = s
            .drop_payload(
                Ok(DragPayload::NewToken(NewTokenPayload {
                    token_type: "item".into(),
                    icon: "Gem".into(),
                    name: "Loot".into(),
                })),
                at,
            )
            .unwrap();
        assert_eq!((t.x, t.y), (4, 3));
    }

    #[test]
    fn brush_paints_reveal_and_hide() {
        let mut s = gm();
        s.apply(SessionAction::SetBrushActive(true));
        s.apply(SessionAction::SetBrushSize(1));
        let p = centre_of(&s, 3, 3);
        assert!(s.pointer_down(PointerButton::Primary, p));
        assert!(s.fog().is_revealed(3, 3));
        assert!(s.pointer_move(centre_of(&s, 4, 3)));
        assert!(s.fog().is_revealed(4, 3));
        // same cell again changes nothing
        assert!(!s.pointer_move(centre_of(&s, 4, 3)));
        s.pointer_up();

        assert!(s.pointer_down(PointerButton::Secondary, p));
        assert!(s.suppresses_context_menu());
        assert!(!s.fog().is_revealed(3, 3));
        s.pointer_leave();
        assert!(s.interaction().is_idle());
        assert_eq!(s.fog().revealed_count(), 1);
    }

    #[test]
    fn unchanged_paint_keeps_the_same_fog_allocation() {
        let mut s = gm();
        s.apply(SessionAction::SetAllFog { revealed: true });
        let before = Rc::clone(s.fog());
        assert!(!s.apply(SessionAction::PaintFog {
            center: GridPoint::new(5, 5),
            radius: 2,
            reveal: true,
        }));
        assert!(Rc::ptr_eq(&before, s.fog()));
    }

    #[test]
    fn middle_drag_pans() {
        let mut s = gm();
        s.pointer_down(PointerButton::Middle, ScreenPoint::new(10.0, 10.0));
        assert!(s.pointer_move(ScreenPoint::new(60.0, -15.0)));
        assert_eq!(s.viewport().offset, ScreenPoint::new(50.0, -25.0));
        s.pointer_up();
        assert!(!s.pointer_move(ScreenPoint::new(500.0, 500.0)));

        // leaving the surface mid-pan drops the gesture
        s.pointer_down(PointerButton::Middle, ScreenPoint::new(0.0, 0.0));
        assert!(s.pointer_leave());
        assert!(s.interaction().is_idle());
        assert!(!s.pointer_move(ScreenPoint::new(80.0, 80.0)));
        assert_eq!(s.viewport().offset, ScreenPoint::new(50.0, -25.0));
    }

    #[test]
    fn right_click_finds_editable_token() {
        let mut s = gm();
        s.seed_demo_tokens();
        let drone = centre_of(&s, 11, 9);
        let found = s.editable_token_at(drone).map(|t| t.name.clone());
        assert_eq!(found.as_deref(), Some("Security Drone"));
        assert!(s.editable_token_at(centre_of(&s, 0, 0)).is_none());

        s.apply(SessionAction::SetBrushActive(true));
        assert!(s.editable_token_at(drone).is_none());
        s.apply(SessionAction::SetBrushActive(false));
        assert!(s.player_mirror().editable_token_at(drone).is_none());
    }

    #[test]
    fn wheel_zooms_toward_cursor() {
        let mut s = gm();
        let p = ScreenPoint::new(100.0, 100.0);
        let before = s.cell_at(p);
        assert!(s.wheel(p, -500.0));
        assert!((s.viewport().scale - 1.5).abs() < 1e-9);
        assert_eq!(s.cell_at(p), before);
        assert!(s.apply(SessionAction::ResetView));
        assert_eq!(*s.viewport(), Viewport::default());
    }

    #[test]
    fn loading_a_map_rebuilds_grid_and_fog() {
        let mut s = gm();
        s.seed_demo_tokens();
        s.apply(SessionAction::SetAllFog { revealed: true });
        assert!(s.apply(SessionAction::LoadMap(MapImage {
            url: "dungeon.png".into(),
            width_px: 410,
            height_px: 200,
        })));
        assert_eq!(s.grid(), GridSize::new(11, 5));
        assert_eq!(s.fog().size(), s.grid());
        assert_eq!(s.fog().revealed_count(), 0);
        for t in s.tokens().as_slice() {
            assert!(t.x + t.size <= 11 && t.y + t.size <= 5, "{t:?}");
        }
        assert!(s.apply(SessionAction::ClearMap));
        assert_eq!(s.grid(), GridSize::new(30, 20));
        assert!(!s.apply(SessionAction::ClearMap));
    }

    #[test]
    fn player_mirror_is_read_only() {
        let mut g = gm();
        g.seed_demo_tokens();
        let mut p = g.player_mirror();
        assert!(!p.is_gm());
        let id = g.tokens().as_slice()[0].id.clone();

        assert!(!p.apply(SessionAction::RemoveToken { id: id.clone() }));
        assert!(!p.apply(SessionAction::SetAllFog { revealed: true }));
        assert!(!p.apply(SessionAction::SetBrushActive(true)));
        assert!(!p.pointer_down(PointerButton::Middle, ScreenPoint::ORIGIN));
        assert!(!p.begin_token_drag(&id));
        assert!(p.drop_payload(undead_drop(), ScreenPoint::ORIGIN).is_none());
        assert!(p.interaction().is_idle());
        assert_eq!(p.tokens().len(), 5);
        // the player's own viewport can still move
        assert!(p.apply(SessionAction::ZoomBy {
            point: ScreenPoint::ORIGIN,
            factor: 1.2,
        }));
    }

    #[test]
    fn player_sees_only_revealed_tokens() {
        let mut g = gm();
        g.seed_demo_tokens();
        let mut p = g.player_mirror();
        assert!(p.visible_tokens().is_empty());
        assert_eq!(g.visible_tokens().len(), 5);

        g.apply(SessionAction::PaintFog {
            center: GridPoint::new(3, 4),
            radius: 0,
            reveal: true,
        });
        assert!(p.sync_from(&g));
        let names: Vec<_> = p.visible_tokens().iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, vec!["Cyber-Ronin".to_string()]);
        assert!(!p.sync_from(&g));
    }

    #[test]
    fn sync_keeps_player_viewport() {
        let mut g = gm();
        let mut p = g.player_mirror();
        p.apply(SessionAction::PanBy { dx: 30.0, dy: 0.0 });
        g.apply(SessionAction::PanBy { dx: -400.0, dy: 0.0 });
        g.apply(SessionAction::SetAllFog { revealed: true });
        p.sync_from(&g);
        assert_eq!(p.viewport().offset, ScreenPoint::new(30.0, 0.0));
    }

    #[test]
    fn collaborator_edits_flow_through_apply() {
        let mut s = gm();
        assert!(s.apply(SessionAction::AddToken(
            TokenDraft::new("Guardian", TokenKind::Player, "Shield").at(2, 2)
        )));
        let id = s.tokens().as_slice()[0].id.clone();
        assert!(s.apply(SessionAction::UpdateToken {
            id: id.clone(),
            patch: TokenPatch {
                color: Some("#fff".into()),
                ..TokenPatch::default()
            },
        }));
        assert!(s.apply(SessionAction::MoveToken {
            id: id.clone(),
            x: -5,
            y: 40,
        }));
        let t = s.tokens().get(&id).unwrap();
        assert_eq!((t.x, t.y, t.color.as_str()), (0, 19, "#fff"));
        assert!(s.apply(SessionAction::RemoveToken { id: id.clone() }));
        assert!(!s.apply(SessionAction::RemoveToken { id }));
    }

    #[test]
    fn brush_settings_are_clamped_and_tracked() {
        let mut s = gm();
        assert!(s.apply(SessionAction::SetBrushSize(50)));
        assert_eq!(s.brush().size, BrushSettings::MAX_SIZE);
        assert!(s.apply(SessionAction::SetFogOpacity(140)));
        assert_eq!(s.brush().fog_opacity, 100);
        assert_eq!(s.config().fog_opacity, 100);
        assert!(!s.suppresses_context_menu());
        s.apply(SessionAction::SetBrushActive(true));
        assert!(s.suppresses_context_menu());
    }
}
