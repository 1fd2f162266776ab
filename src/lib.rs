pub mod constants;
pub mod controller;
pub mod engine;
pub mod errors;
pub mod settings;
pub mod ui;
