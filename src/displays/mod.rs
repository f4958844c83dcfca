//! Per-panel presets: rotation tables, init sequences and config defaults.

/// Generic 240x320 ST7789 panel
pub mod st7789_240x320;
/// 135x240 ST7789 panel with window start offsets
pub mod st7789_135x240;
/// 240x536 RM67162 AMOLED panel with brightness control
pub mod rm67162;
