pub mod context;
pub mod main_view;
pub mod messages;
pub mod overlay;
pub mod resources;
pub mod state;
pub mod theme;

pub use context::UiContext;
pub use main_view::MainView;
pub use messages::Request;
