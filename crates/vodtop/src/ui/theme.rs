//! Shared theme utilities for the vodtop TUI.

use ratatui::style::Color;
use vodtop_tracker::ColorSlot;

/// Highlight colours for addresses with concurrent sessions, in slot order.
pub const PALETTE: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

/// Maps an allocator slot onto the palette, wrapping if the configured
/// palette is larger than the built-in one.
pub fn slot_color(slot: ColorSlot) -> Color {
    PALETTE
        .get(slot.0 % PALETTE.len())
        .copied()
        .unwrap_or(Color::Reset)
}

/// Foreground for a session row: its address colour, or the default.
pub fn row_color(slot: Option<ColorSlot>) -> Color {
    slot.map_or(Color::Reset, slot_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_colors_follow_palette() {
        assert_eq!(slot_color(ColorSlot(0)), Color::Red);
        assert_eq!(slot_color(ColorSlot(5)), Color::Cyan);
    }

    #[test]
    fn test_slot_color_wraps() {
        assert_eq!(slot_color(ColorSlot(6)), Color::Red);
        assert_eq!(slot_color(ColorSlot(8)), Color::Yellow);
    }

    #[test]
    fn test_uncolored_row_uses_default() {
        assert_eq!(row_color(None), Color::Reset);
        assert_eq!(row_color(Some(ColorSlot(1))), Color::Green);
    }
}
