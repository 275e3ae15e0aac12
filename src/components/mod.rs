pub mod history_panel;
pub mod prediction_card;
pub mod sidebar;
pub mod status_badge;
pub mod symptom_picker;
