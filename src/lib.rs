// Game logic, storage and runtime, shared by the binary and the headless tests.
// Rendering lives with the binary in main.rs and ui/.
pub mod app_dirs;
pub mod cache;
pub mod config;
pub mod dictionary;
pub mod evaluate;
pub mod game;
pub mod logging;
pub mod runtime;
pub mod util;
pub mod words;
