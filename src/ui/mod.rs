//! Terminal interaction: prompts, menus and message styling

mod console;
pub mod menu;
pub mod theme;

pub use console::{Console, StdConsole};
pub use menu::{AsyncHandlerMap, Flow, HandlerMap, InteractiveBase};
pub use theme::ThemeColors;
