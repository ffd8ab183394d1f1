pub mod app;
pub mod gym_modal;
pub mod layer_panel;
pub mod map_view;
pub mod sidebar;
pub mod zoom_controls;
