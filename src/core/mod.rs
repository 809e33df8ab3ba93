pub mod config;
pub mod format;
pub mod mime;
pub mod model;
pub mod search;
