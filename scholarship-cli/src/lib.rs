pub mod app;
pub mod logging;
pub mod report;
pub mod settings;
pub mod utils;
