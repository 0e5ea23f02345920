pub mod capture;
pub mod dialogs;
pub mod history_panel;
pub mod milestone_palette;
pub mod theme;
pub mod timeline_chart;
pub mod toolbar;
