pub mod controller;
pub mod engine;
pub mod plugin;
pub mod registry;
pub mod runner;
pub mod suite;

/// What one invocation does, chosen by the `--run` argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Executes the selected suites and writes their spool files.
    Plugin { selection: String },
    /// Reports the freshness of existing spool files.
    Controller,
}
