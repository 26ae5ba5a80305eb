use crate::configuration::constants::common::{ENGINE_CRASH_RC, ROBOT_EXECUTABLE, ROBOT_FLAGS};
use crate::configuration::tree::{ConfigTree, Setting};
use crate::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executes the tests of one suite directory and reports the result code.
pub trait TestEngine {
    fn run(&self, directory: &Path, settings: &ConfigTree) -> i32;
}

/// Command line of a single `robot` invocation.
#[derive(Debug, PartialEq)]
pub struct RobotCommand {
    pub executable: String,
    pub arguments: Vec<String>,
}

impl RobotCommand {
    pub fn new(executable: &str, directory: &Path, settings: &ConfigTree) -> Self {
        let mut command = Self {
            executable: executable.to_owned(),
            arguments: vec![],
        };
        for (key, value) in settings.iter() {
            command.add_option(key, value);
        }
        command
            .arguments
            .push(directory.to_string_lossy().into_owned());
        command
    }

    fn add_option(&mut self, key: &str, value: &Setting) {
        let flag = format!("--{}", key);
        match value {
            Setting::Nil | Setting::Bool(false) => {}
            Setting::Bool(true) => self.arguments.push(flag),
            // Environment values arrive as text.
            Setting::Text(_) if ROBOT_FLAGS.contains(&key) => {
                if value.as_bool() == Some(true) {
                    self.arguments.push(flag);
                }
            }
            Setting::List(items) => {
                for item in items {
                    self.add_option(key, item);
                }
            }
            Setting::Tree(tree) => {
                for (name, item) in tree.iter() {
                    self.arguments.push(flag.clone());
                    self.arguments.push(format!("{}:{}", name, item));
                }
            }
            scalar => {
                self.arguments.push(flag);
                self.arguments.push(scalar.to_string());
            }
        }
    }
}

impl From<&RobotCommand> for Command {
    fn from(robot: &RobotCommand) -> Self {
        let mut command = Command::new(&robot.executable);
        command.args(&robot.arguments);
        command
    }
}

impl fmt::Display for RobotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.executable, self.arguments.join(" "))
    }
}

/// Runs suites with the Robot Framework command line runner. The call blocks
/// until the runner exits.
#[derive(Debug, Clone)]
pub struct RobotEngine {
    executable: String,
}

impl Default for RobotEngine {
    fn default() -> Self {
        Self::new(ROBOT_EXECUTABLE)
    }
}

impl RobotEngine {
    pub fn new(executable: &str) -> Self {
        Self {
            executable: executable.to_owned(),
        }
    }

    /// Resolves the runner on `PATH`.
    pub fn locate(&self) -> Result<PathBuf, Error> {
        which::which(&self.executable)
            .map_err(|err| Error::MissingDependency(format!("{} ({})", self.executable, err)))
    }
}

impl TestEngine for RobotEngine {
    fn run(&self, directory: &Path, settings: &ConfigTree) -> i32 {
        let command = RobotCommand::new(&self.executable, directory, settings);
        debug!("Executing {}", command);
        match Command::from(&command).output() {
            Ok(output) => {
                if !output.stdout.is_empty() {
                    debug!("{}", String::from_utf8_lossy(&output.stdout).trim_end());
                }
                if !output.stderr.is_empty() {
                    warn!("{}", String::from_utf8_lossy(&output.stderr).trim_end());
                }
                output.status.code().unwrap_or_else(|| {
                    error!("{} was terminated by a signal", self.executable);
                    ENGINE_CRASH_RC
                })
            }
            Err(err) => {
                error!("Cannot execute {}: {}", self.executable, err);
                ENGINE_CRASH_RC
            }
        }
    }
}
