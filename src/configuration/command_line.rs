use crate::app::Mode;
use crate::configuration::constants::cargo_env::CARGO_PKG_NAME;
use crate::configuration::constants::common::SELECT_ALL;
use clap::arg_enum;
use log::LevelFilter;
use structopt::StructOpt;

arg_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum LogLevel {
        Off, Error, Warn, Info, Debug, Trace,
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = CARGO_PKG_NAME)]
pub struct Opt {
    /// Runs suites as agent plugin. Takes a comma-separated list of suite ids
    /// or `all`; without a value every suite runs. Omit to check spool files
    #[structopt(long, short = "r")]
    pub run: Option<Option<String>>,

    /// Mirrors log output to stderr
    #[structopt(long, short = "v")]
    pub verbose: bool,

    /// Sets a logging level
    #[structopt(case_insensitive = true, long, short = "L", possible_values = &LogLevel::variants())]
    pub logging: Option<LogLevel>,
}

impl Opt {
    pub fn mode(&self) -> Mode {
        match self.run {
            None => Mode::Controller,
            Some(None) => Mode::Plugin {
                selection: SELECT_ALL.to_owned(),
            },
            Some(Some(ref selection)) => Mode::Plugin {
                selection: selection.clone(),
            },
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.logging.unwrap_or(LogLevel::Debug).into()
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
