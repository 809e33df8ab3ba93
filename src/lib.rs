// Aggregation core for the "my groups" summary panel: per-group manager and
// latest-content lookups fanned out asynchronously and folded into a
// render-ready view model.

pub mod coordinator;
pub mod core;
pub mod logging;
pub mod render;
pub mod services;
pub mod widget;
