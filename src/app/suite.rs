use crate::configuration::constants::keys;
use crate::configuration::loader::RmkConfig;
use crate::configuration::tree::{ConfigTree, Setting};
use crate::error::Error;
use crate::time::timeunit::DurationUnit;
use chrono::NaiveDateTime;
use std::convert::TryFrom;
use std::path::PathBuf;

/// One selected suite and the state of its execution within this run.
#[derive(Debug, Clone, PartialEq)]
pub struct Suite {
    pub id: String,
    /// Directory name below `robotdir`.
    pub path: String,
    pub cache_time: i64,
    global: ConfigTree,
    settings: ConfigTree,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub rc: Option<i32>,
}

impl Suite {
    /// Builds the suite from its configured settings. `path` and `cache_time`
    /// are lifted out of the settings; everything left is passed to the
    /// test engine.
    pub fn new(id: &str, config: &RmkConfig) -> Result<Self, Error> {
        let global = config.global_dict().clone();
        let mut settings = config.suite_dict(id);
        let path = settings
            .remove(keys::PATH)
            .and_then(|path| path.as_text())
            .unwrap_or_else(|| id.to_owned());
        let cache_time = match settings.remove(keys::CACHE_TIME) {
            Some(value) => cache_time_secs(&format!("{}.{}.{}", keys::SUITES, id, keys::CACHE_TIME), &value)?,
            None => {
                let value = global
                    .get(keys::CACHE_TIME)
                    .ok_or_else(|| Error::MissingSetting(format!("{}.{}", keys::GLOBAL, keys::CACHE_TIME)))?;
                cache_time_secs(&format!("{}.{}", keys::GLOBAL, keys::CACHE_TIME), value)?
            }
        };
        Ok(Self {
            id: id.to_owned(),
            path,
            cache_time,
            global,
            settings,
            start_time: None,
            end_time: None,
            rc: None,
        })
    }

    /// Options handed to the test engine.
    pub fn settings(&self) -> &ConfigTree {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ConfigTree {
        &mut self.settings
    }

    pub fn outputdir(&self) -> Result<PathBuf, Error> {
        self.global
            .require_str(keys::GLOBAL, keys::OUTPUTDIR)
            .map(PathBuf::from)
    }

    pub fn directory(&self) -> Result<PathBuf, Error> {
        let robotdir = self.global.require_str(keys::GLOBAL, keys::ROBOTDIR)?;
        Ok(PathBuf::from(robotdir).join(&self.path))
    }

    /// Absolute path of an output artifact; `None` until the suite has been
    /// prepared for execution.
    fn artifact(&self, key: &str) -> Option<PathBuf> {
        let file = self.settings.get_str(key)?;
        Some(match self.outputdir() {
            Ok(dir) => dir.join(file),
            Err(_) => PathBuf::from(file),
        })
    }

    pub fn outfile_xml(&self) -> Option<PathBuf> {
        self.artifact(keys::OUTPUT)
    }

    pub fn outfile_htmllog(&self) -> Option<PathBuf> {
        self.artifact(keys::LOG)
    }
}

fn cache_time_secs(path: &str, value: &Setting) -> Result<i64, Error> {
    if let Some(secs) = value.as_int() {
        return Ok(secs);
    }
    let invalid = |reason: String| Error::InvalidSetting {
        path: path.to_owned(),
        value: value.to_string(),
        reason,
    };
    let text = value
        .as_text()
        .ok_or_else(|| invalid("expected seconds or a duration".to_owned()))?;
    let duration: DurationUnit = text.parse().map_err(|e: crate::time::error::Error| invalid(e.to_string()))?;
    duration
        .as_secs()
        .and_then(|secs| i64::try_from(secs).ok())
        .ok_or_else(|| invalid("out of range".to_owned()))
}
