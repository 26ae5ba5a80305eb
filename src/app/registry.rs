//! Resolution of the suites one invocation runs.
use crate::app::suite::Suite;
use crate::configuration::constants::common::SELECT_ALL;
use crate::configuration::constants::keys;
use crate::configuration::loader::RmkConfig;
use crate::configuration::tree::{ConfigTree, Setting};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The `--run` argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    All,
    Ids(Vec<String>),
}

impl Selection {
    /// Parses `all` or a comma-separated id list. Ids are trimmed, empty ones
    /// dropped and duplicates removed; comparison stays case-sensitive.
    pub fn parse(argument: &str) -> Self {
        if argument.trim() == SELECT_ALL {
            return Selection::All;
        }
        let mut ids: Vec<String> = vec![];
        for id in argument.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            if !ids.iter().any(|known| known == id) {
                ids.push(id.to_owned());
            }
        }
        Selection::Ids(ids)
    }
}

/// Returns the suites to start for `selection`, rewriting the suites branch
/// of `config` accordingly. Without a selection nothing is started.
pub fn suites_to_start(config: &mut RmkConfig, selection: Option<&str>) -> BTreeMap<String, Suite> {
    let selection = match selection {
        Some(argument) => Selection::parse(argument),
        None => return BTreeMap::new(),
    };
    match selection {
        Selection::All => {
            if config.suites_dict().is_empty() {
                let discovered = discover_suites(config.global_dict());
                config.set_suites_dict(discovered);
            }
        }
        Selection::Ids(ids) => reconcile(config, &ids),
    }
    info!(" => Suites to start: {}", config.suites().join(", "));
    build_suites(config)
}

/// Every subdirectory of `robotdir` becomes a suite with default settings.
fn discover_suites(global: &ConfigTree) -> ConfigTree {
    let robotdir = match global.require_str(keys::GLOBAL, keys::ROBOTDIR) {
        Ok(robotdir) => robotdir,
        Err(err) => {
            error!("{}", err);
            return ConfigTree::new();
        }
    };
    info!("No suites configured; looking for suite directories in {}", robotdir);
    match suite_directories(Path::new(&robotdir)) {
        Ok(names) => names
            .into_iter()
            .map(|name| (name, Setting::Tree(ConfigTree::new())))
            .collect(),
        Err(err) => {
            error!("Cannot list suite directories in {}: {}", robotdir, err);
            ConfigTree::new()
        }
    }
}

fn suite_directories(robotdir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = vec![];
    for entry in fs::read_dir(robotdir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn reconcile(config: &mut RmkConfig, ids: &[String]) {
    let configured = config.suites();
    let added: Vec<&String> = ids.iter().filter(|id| !configured.contains(id)).collect();
    if !added.is_empty() {
        info!(
            "(+) Adding suites {} (not configured, but selected; they start with default settings)",
            added.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
        );
    }
    let suites = config.suites_dict_mut();
    for id in configured.iter() {
        if ids.contains(id) {
            info!("( ) Keeping suite {} (configured and selected)", id);
        } else {
            info!("(-) Skipping suite {} (configured, but not selected)", id);
            suites.remove(id);
        }
    }
    for id in added {
        suites.insert(id.as_str(), ConfigTree::new());
    }
}

fn build_suites(config: &RmkConfig) -> BTreeMap<String, Suite> {
    let mut suites = BTreeMap::new();
    for id in config.suites() {
        match Suite::new(&id, config) {
            Ok(suite) => {
                suites.insert(id, suite);
            }
            Err(err) => error!("Suite {} cannot be started: {}", id, err),
        }
    }
    suites
}
