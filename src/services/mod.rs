pub mod content;
pub mod directory;
pub mod members;
