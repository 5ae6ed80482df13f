// Library root: exposes the terminal dashboard so integration tests can
// drive it without a real terminal.

pub mod tui;
