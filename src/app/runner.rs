use crate::app::engine::TestEngine;
use crate::app::suite::Suite;
use crate::configuration::constants::common::MAX_TEST_FAILURE_RC;
use crate::configuration::constants::keys;
use crate::configuration::tree::{ConfigTree, Setting};
use crate::error::Error;
use crate::time::local_now;
use derivative::Derivative;

/// Result codes above 250 come from the engine itself, not from failed tests.
pub fn is_fatal_rc(rc: i32) -> bool {
    rc > MAX_TEST_FAILURE_RC
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct SuiteRunner<'a> {
    #[derivative(Debug = "ignore")]
    engine: &'a dyn TestEngine,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(engine: &'a dyn TestEngine) -> Self {
        Self { engine }
    }

    /// Executes one suite and records its window and result code on it.
    pub fn start(&self, suite: &mut Suite) -> Result<i32, Error> {
        robotize_variables(suite.settings_mut());
        update_filenames(suite, now!())?;
        let directory = suite.directory()?;

        suite.start_time = Some(local_now());
        let rc = self.engine.run(&directory, suite.settings());
        suite.end_time = Some(local_now());
        suite.rc = Some(rc);
        Ok(rc)
    }
}

/// Turns a `variable` map into the `name:value` list the engine expects.
/// Any other shape is left as configured.
pub fn robotize_variables(settings: &mut ConfigTree) {
    let variables = match settings.get(keys::VARIABLE) {
        Some(Setting::Tree(variables)) => variables
            .iter()
            .map(|(name, value)| Setting::Text(format!("{}:{}", name, value)))
            .collect::<Vec<_>>(),
        _ => return,
    };
    settings.insert(keys::VARIABLE, variables);
}

/// Names the output artifacts after the suite id and `timestamp` and points
/// the engine at the output directory.
pub fn update_filenames(suite: &mut Suite, timestamp: i64) -> Result<(), Error> {
    let outputdir = suite.outputdir()?;
    let stem = format!("robotframework_{}_{}", suite.id, timestamp);
    let settings = suite.settings_mut();
    settings.insert(keys::OUTPUTDIR, outputdir.to_string_lossy().into_owned());
    settings.insert(keys::OUTPUT, format!("{}_output.xml", stem));
    settings.insert(keys::LOG, format!("{}_log.html", stem));
    settings.insert(keys::REPORT, format!("{}_report.html", stem));
    Ok(())
}
