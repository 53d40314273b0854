//! Domain-level keyboard actions independent of key bindings.

/// User intent in the feed view.
///
/// The mapping from `crossterm::event::KeyEvent` to `KeyAction` is handled
/// by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Scroll up by one row. Default: k/↑
    ScrollUp,
    /// Scroll down by one row. Default: j/↓
    ScrollDown,
    /// Scroll up by one viewport. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one viewport. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the top of the feed. Default: g/Home
    ScrollToTop,
    /// Jump to the bottom of the loaded feed. Default: G/End
    ScrollToBottom,
    /// Select the next card in reading order. Default: Tab
    NextCard,
    /// Select the previous card in reading order. Default: Shift+Tab
    PrevCard,
    /// Open the selected card's place. Default: Enter
    OpenCard,
    /// Quit the application. Default: q/Esc
    Quit,
}
