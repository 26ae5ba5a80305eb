pub mod command_line;
pub mod constants;
pub mod defaults;
pub mod environment;
pub mod loader;
pub mod tree;
