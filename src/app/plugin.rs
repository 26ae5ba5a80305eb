use crate::app::engine::TestEngine;
use crate::app::registry::suites_to_start;
use crate::app::runner::{is_fatal_rc, SuiteRunner};
use crate::app::suite::Suite;
use crate::configuration::loader::RmkConfig;
use crate::reporter::spool::SpoolStore;
use derivative::Derivative;
use std::collections::BTreeMap;

/// Plugin mode: runs the selected suites one after another and spools their
/// results.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Plugin {
    suites: BTreeMap<String, Suite>,
    #[derivative(Debug = "ignore")]
    engine: Box<dyn TestEngine>,
}

impl Plugin {
    pub fn new(mut config: RmkConfig, selection: &str, engine: Box<dyn TestEngine>) -> Self {
        let suites = suites_to_start(&mut config, Some(selection));
        Self { suites, engine }
    }

    #[cfg(test)]
    pub fn suites(&self) -> &BTreeMap<String, Suite> {
        &self.suites
    }

    pub fn start_suites(&mut self) {
        info!("Registered {} suites", self.suites.len());
        let runner = SuiteRunner::new(self.engine.as_ref());
        for (id, suite) in self.suites.iter_mut() {
            info!("---------- Suite {} ----------", id);
            match runner.start(suite) {
                Ok(rc) => {
                    info!("Suite finished, RC: {}", rc);
                    if is_fatal_rc(rc) {
                        error!("RC {} of suite {} is a fatal Robot Framework error.", rc, id);
                        error!("Run the suite manually with the same arguments to reproduce it.");
                    }
                }
                Err(err) => {
                    error!("Suite {} could not be started: {}", id, err);
                    continue;
                }
            }
            let written = SpoolStore::for_suite(suite).and_then(|store| store.write(suite));
            if let Err(err) = written {
                error!("Cannot write spool file of suite {}: {}", id, err);
            }
        }
    }
}
