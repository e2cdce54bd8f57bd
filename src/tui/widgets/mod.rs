//! TUI widgets

pub mod chart;
pub mod chrome;
pub mod help;
pub mod price_chart;
pub mod spinner;
pub mod summary;
pub mod tabs;
pub mod volatility_chart;
pub mod volume_chart;
