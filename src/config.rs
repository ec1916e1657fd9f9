//! User-tunable settings, persisted to `localStorage` as JSON.

use serde::{Deserialize, Serialize};

use crate::model::{BrushSettings, CELL_SIZE_PX, GridSize};

const STORAGE_KEY: &str = "bm_settings";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub cell_size_px: f64,
    /// Grid used when no background image is loaded.
    pub default_grid: GridSize,
    /// Fresh maps start fully fogged unless this is set.
    pub start_revealed: bool,
    pub wheel_sensitivity: f64,
    /// Factor applied by the zoom buttons.
    pub zoom_step: f64,
    pub brush_size: u32,
    pub fog_opacity: u8,
    /// Place the demo party on a new GM session.
    pub seed_demo_tokens: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            cell_size_px: CELL_SIZE_PX,
            default_grid: GridSize::new(30, 20),
            start_revealed: false,
            wheel_sensitivity: 0.001,
            zoom_step: 1.2,
            brush_size: 3,
            fog_opacity: 80,
            seed_demo_tokens: true,
        }
    }
}

impl MapConfig {
    /// Parse stored settings; unknown or broken input yields defaults.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str::<MapConfig>(raw)
            .map(MapConfig::sanitized)
            .unwrap_or_default()
    }

    fn sanitized(mut self) -> Self {
        let d = MapConfig::default();
        if !self.cell_size_px.is_finite() || self.cell_size_px < 4.0 {
            self.cell_size_px = d.cell_size_px;
        }
        if !self.wheel_sensitivity.is_finite() || self.wheel_sensitivity <= 0.0 {
            self.wheel_sensitivity = d.wheel_sensitivity;
        }
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            self.zoom_step = d.zoom_step;
        }
        self.default_grid = GridSize::new(self.default_grid.width, self.default_grid.height);
        let brush = BrushSettings::new(self.brush_size, self.fog_opacity);
        self.brush_size = brush.size;
        self.fog_opacity = brush.fog_opacity;
        self
    }

    pub fn brush(&self) -> BrushSettings {
        BrushSettings::new(self.brush_size, self.fog_opacity)
    }

    pub fn load() -> Self {
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(Some(raw)) = store.get_item(STORAGE_KEY) {
                    return Self::from_json(&raw);
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(s) = serde_json::to_string(self) {
                    let _ = store.set_item(STORAGE_KEY, &s);
                }
            }
        }
    }
}
