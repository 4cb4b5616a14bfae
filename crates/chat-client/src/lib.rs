pub mod api;
pub mod cli;
pub mod render;
pub mod session;
pub mod terminal;
pub mod transcript;
