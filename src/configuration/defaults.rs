use crate::configuration::constants::keys;
use crate::configuration::tree::{ConfigTree, Setting};

/// Operating system family the compiled-in defaults are keyed by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OsFamily {
    Nt,
    Posix,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(windows) {
            OsFamily::Nt
        } else {
            OsFamily::Posix
        }
    }
}

fn table(pairs: &[(&str, Setting)]) -> ConfigTree {
    pairs
        .iter()
        .map(|(key, value)| (*key, value.clone()))
        .collect()
}

pub fn os_defaults(family: OsFamily) -> ConfigTree {
    match family {
        OsFamily::Nt => table(&[
            ("agent_data_dir", "C:/ProgramData/checkmk/agent".into()),
            (keys::AGENT_CONFIG_DIR, "C:/ProgramData/checkmk/agent/config".into()),
            ("agent_spool_dir", "C:/ProgramData/checkmk/agent/spool".into()),
            (keys::OUTPUTDIR, "C:/Windows/temp".into()),
            (keys::LOGDIR, "C:/Windows/temp".into()),
            (keys::ROBOTDIR, "C:/ProgramData/checkmk/agent/robot".into()),
        ]),
        OsFamily::Posix => table(&[
            ("agent_data_dir", "/usr/lib/check_mk_agent".into()),
            (keys::AGENT_CONFIG_DIR, "/etc/check_mk".into()),
            ("agent_spool_dir", "/var/lib/check_mk_agent/spool".into()),
            (keys::OUTPUTDIR, "/tmp/robot".into()),
            (keys::LOGDIR, "/var/log".into()),
            (keys::ROBOTDIR, "/usr/lib/check_mk_agent/robot".into()),
        ]),
    }
}

pub fn noarch_defaults() -> ConfigTree {
    table(&[
        (keys::ROBOTMK_YML, "robotmk.yml".into()),
        (keys::LOGGING, true.into()),
        (keys::CACHE_TIME, 900i64.into()),
        ("execution_mode", "agent_serial".into()),
        ("agent_output_encoding", "zlib_codec".into()),
        ("log_rotation", 7i64.into()),
    ])
}

/// The merged defaults for one platform; OS-specific values win over noarch.
pub fn global_defaults(family: OsFamily) -> ConfigTree {
    noarch_defaults().merged(os_defaults(family))
}

/// The lowest configuration layer: `{global: <defaults>}`.
pub fn defaults_layer(family: OsFamily) -> ConfigTree {
    let mut layer = ConfigTree::new();
    layer.insert(keys::GLOBAL, global_defaults(family));
    layer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_defaults_win_over_noarch() {
        let globals = global_defaults(OsFamily::Posix);
        assert_eq!(globals.get_str(keys::OUTPUTDIR), Some("/tmp/robot".to_owned()));
        assert_eq!(globals.get_str(keys::ROBOTMK_YML), Some("robotmk.yml".to_owned()));
        assert_eq!(globals.get_int(keys::CACHE_TIME), Some(900));
    }

    #[test]
    fn test_nt_defaults() {
        let globals = global_defaults(OsFamily::Nt);
        assert_eq!(
            globals.get_str(keys::AGENT_CONFIG_DIR),
            Some("C:/ProgramData/checkmk/agent/config".to_owned())
        );
        assert_eq!(globals.get_bool(keys::LOGGING), Some(true));
    }

    #[test]
    fn test_defaults_layer_has_only_global_branch() {
        let layer = defaults_layer(OsFamily::Posix);
        assert_eq!(layer.keys().collect::<Vec<_>>(), vec!["global"]);
    }
}
