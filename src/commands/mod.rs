pub mod logging;
pub mod overlay;
pub mod shortcut;
