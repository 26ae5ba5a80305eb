use crate::configuration::constants::environment::PREFIX;
use crate::configuration::constants::keys;
use crate::configuration::defaults::{defaults_layer, OsFamily};
use crate::configuration::environment::EnvVarDecoder;
use crate::configuration::tree::{ConfigTree, Setting};
use crate::error::Error;
use config::{Config, ConfigError, File, FileFormat};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The resolved configuration of one invocation:
/// compiled-in defaults, overlaid by the control file, overlaid by
/// `ROBOTMK_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct RmkConfig {
    global: ConfigTree,
    suites: ConfigTree,
}

impl RmkConfig {
    /// Resolves the configuration for the running platform from the process
    /// environment.
    pub fn load() -> Result<Self, Error> {
        let vars = std::env::vars_os().map(|(name, value)| {
            (
                name.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        });
        Self::load_with(OsFamily::current(), vars)
    }

    pub fn load_with<I, K, V>(family: OsFamily, vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        let defaults = defaults_layer(family);
        let control_file = control_file_path(&defaults, &vars);
        let file_layer = read_control_file(&control_file)?;
        let env_layer = EnvVarDecoder::default().decode(vars);
        Ok(Self::from_layers(defaults, file_layer, env_layer))
    }

    /// Deep-merges the three layers, lowest precedence first.
    pub fn from_layers(defaults: ConfigTree, file: ConfigTree, env: ConfigTree) -> Self {
        let mut merged = defaults.merged(file).merged(env);
        Self {
            global: branch(&mut merged, keys::GLOBAL),
            suites: branch(&mut merged, keys::SUITES),
        }
    }

    pub fn global_dict(&self) -> &ConfigTree {
        &self.global
    }

    pub fn suites_dict(&self) -> &ConfigTree {
        &self.suites
    }

    pub fn suites_dict_mut(&mut self) -> &mut ConfigTree {
        &mut self.suites
    }

    pub fn set_suites_dict(&mut self, suites: ConfigTree) {
        self.suites = suites;
    }

    /// Configured suite ids, sorted.
    pub fn suites(&self) -> Vec<String> {
        self.suites.keys().cloned().collect()
    }

    /// Settings of one suite; a suite declared without settings yields an
    /// empty tree.
    pub fn suite_dict(&self, id: &str) -> ConfigTree {
        self.suites.tree(id).cloned().unwrap_or_default()
    }
}

fn branch(merged: &mut ConfigTree, key: &str) -> ConfigTree {
    match merged.remove(key) {
        Some(Setting::Tree(tree)) => tree,
        _ => ConfigTree::new(),
    }
}

/// Location of the control file. Directory and file name come from the raw
/// `ROBOTMK_AGENT_CONFIG_DIR` / `ROBOTMK_ROBOTMK_YML` variables when present,
/// otherwise from the platform defaults.
pub fn control_file_path(defaults: &ConfigTree, vars: &BTreeMap<String, String>) -> PathBuf {
    let lookup = |key: &str| -> String {
        let var_name = format!("{}{}", PREFIX, key.to_uppercase());
        match vars.get(&var_name) {
            Some(value) => value.clone(),
            None => defaults
                .get_path(&[keys::GLOBAL, key])
                .and_then(Setting::as_text)
                .unwrap_or_default(),
        }
    };
    Path::new(&lookup(keys::AGENT_CONFIG_DIR)).join(lookup(keys::ROBOTMK_YML))
}

/// Reads the YAML control file. A missing or unreadable file is an empty
/// layer; malformed YAML is an [`Error::Parse`].
pub fn read_control_file(path: &Path) -> Result<ConfigTree, Error> {
    if std::fs::File::open(path).is_err() {
        info!("No control file {} found", path.display());
        return Ok(ConfigTree::new());
    }
    debug!("Reading configuration file {}", path.display());
    let mut settings = Config::new();
    settings
        .merge(
            File::from(path.to_path_buf())
                .format(FileFormat::Yaml)
                .required(false),
        )
        .map_err(|err| parse_error(path, err))?;
    settings
        .try_into::<ConfigTree>()
        .map_err(|err| parse_error(path, err))
}

fn parse_error(path: &Path, err: ConfigError) -> Error {
    Error::Parse {
        file: path.to_path_buf(),
        message: err.to_string(),
    }
}
