pub mod app;
pub mod brush_panel;
pub mod camera_controls;
pub mod gm_view;
pub mod map_import_panel;
pub mod map_view;
pub mod player_view;
pub mod token_edit_modal;
pub mod token_library;
