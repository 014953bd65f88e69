pub mod console;
pub mod dashboard;
pub mod text;

pub use console::Console;
pub use dashboard::{DEFAULT_TEMPLATE, Dashboard, serve};
pub use text::TextPresenter;
