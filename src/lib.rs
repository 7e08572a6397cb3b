// Library surface for the binary and for headless/integration tests.
pub mod analyzer;
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod coach;
pub mod config;
pub mod error;
pub mod feedback;
pub mod input;
pub mod language;
pub mod recorder;
pub mod replay;
pub mod runtime;
pub mod session;
pub mod thok;
pub mod typing_policy;
pub mod ui;
pub mod util;
pub mod word_generator;
