// #![forbid(unsafe_code)]
// #![deny(unused_imports)]
//#![deny(missing_docs)]

#[macro_use]
extern crate log;

#[macro_use]
mod time;

mod app;
mod configuration;
mod error;
mod reporter;

use log::LevelFilter;
use std::{env, path::Path, process::exit};
use structopt::StructOpt;

use self::app::controller::Controller;
use self::app::engine::RobotEngine;
use self::app::plugin::Plugin;
use self::app::Mode;
use self::configuration::{
    command_line::Opt,
    constants::{common::LOG_FILE_NAME, environment::PREFIX, keys},
    defaults::{global_defaults, OsFamily},
    loader::RmkConfig,
};
use self::error::Error;

fn main() {
    let options = Opt::from_args();

    if let Err(e) = init_logging(options.level(), options.verbose) {
        eprintln!("{}", e);
    }
    watch_signals();

    if let Err(e) = run(&options) {
        error!("{}", e);
        if e.is_fatal() {
            exit(1);
        }
    }
}

fn run(options: &Opt) -> Result<(), Error> {
    let engine = RobotEngine::default();
    let robot = engine.locate()?;
    debug!("Using test runner {}", robot.display());

    let config = RmkConfig::load()?;
    debug!("Initiated configuration {:#?}", config);

    match options.mode() {
        Mode::Plugin { selection } => {
            info!("Plugin mode, suite selection '{}'", selection);
            let mut plugin = Plugin::new(config, &selection, Box::new(engine));
            plugin.start_suites();
        }
        Mode::Controller => {
            info!("Controller mode, checking spool files");
            for record in Controller::new(config).check_spoolfiles(now!()) {
                println!("{}", record);
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn watch_signals() {
    use signal_hook::{iterator::Signals, SIGINT, SIGTERM};

    match Signals::new(&[SIGINT, SIGTERM]) {
        Ok(signals) => {
            std::thread::spawn(move || {
                for sig in signals.forever() {
                    warn!("Received signal {:?}, stopping", sig);
                    exit(1);
                }
            });
        }
        Err(e) => warn!("Cannot watch signals: {}", e),
    }
}

#[cfg(not(unix))]
fn watch_signals() {}

/// Logs go to `<logdir>/robotmk.log`, and to stderr with `--verbose`. The
/// directory comes from the platform defaults since the control file is not
/// read yet.
fn init_logging(level: LevelFilter, verbose: bool) -> Result<(), Error> {
    let defaults = global_defaults(OsFamily::current());
    let logdir = env::var(format!("{}{}", PREFIX, keys::LOGDIR.to_uppercase()))
        .ok()
        .or_else(|| defaults.get_str(keys::LOGDIR))
        .unwrap_or_default();

    let mut dispatcher = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record
                    .line()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "".to_owned()),
                record.level(),
                message
            ))
        })
        .level(level);

    let mut file_error = None;
    if defaults.get_bool(keys::LOGGING).unwrap_or(true) {
        let log_file = Path::new(&logdir).join(LOG_FILE_NAME);
        match fern::log_file(&log_file) {
            Ok(file) => dispatcher = dispatcher.chain(file),
            Err(e) => file_error = Some(format!("Cannot open log file {}: {}", log_file.display(), e)),
        }
    }
    if verbose || file_error.is_some() {
        dispatcher = dispatcher.chain(std::io::stderr());
    }
    dispatcher.apply()?;

    if let Some(message) = file_error {
        warn!("{}, logging to stderr", message);
    }
    info!("Logging level {} enabled", level);
    Ok(())
}
