use crate::app::suite::Suite;
use crate::configuration::loader::RmkConfig;
use crate::reporter::spool::SpoolStore;
use crate::reporter::staleness::StalenessRecord;

/// Controller mode: checks the spool file of every configured suite without
/// executing anything.
#[derive(Debug)]
pub struct Controller {
    config: RmkConfig,
}

impl Controller {
    pub fn new(config: RmkConfig) -> Self {
        Self { config }
    }

    pub fn check_spoolfiles(&self, now: i64) -> Vec<StalenessRecord> {
        let mut records = vec![];
        for id in self.config.suites() {
            let suite = match Suite::new(&id, &self.config) {
                Ok(suite) => suite,
                Err(err) => {
                    error!("Suite {} cannot be checked: {}", id, err);
                    continue;
                }
            };
            let mtime = match SpoolStore::for_suite(&suite) {
                Ok(store) => store.mtime(&id),
                Err(err) => {
                    error!("Suite {} cannot be checked: {}", id, err);
                    continue;
                }
            };
            let record = StalenessRecord::new(&id, suite.cache_time, mtime, now);
            if record.is_stale() {
                info!("Spool file of suite {} is overdue by {}s", id, record.overdue);
            } else {
                debug!("Spool file of suite {} is fresh: {}", id, record);
            }
            records.push(record);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::constants::keys;
    use crate::configuration::tree::{ConfigTree, Setting};
    use crate::reporter::spool::MTIME_MISSING;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_records_per_configured_suite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("robotmk_fresh.json"), "{}").unwrap();

        let mut global = ConfigTree::new();
        global.insert(keys::CACHE_TIME, 60i64);
        global.insert(keys::OUTPUTDIR, dir.path().to_string_lossy().into_owned());
        let mut layer = ConfigTree::new();
        layer.insert(keys::GLOBAL, global);
        layer.set_path(&[keys::SUITES, "fresh"], ConfigTree::new().into());
        layer.set_path(&[keys::SUITES, "missing", keys::CACHE_TIME], "2m".into());
        let config = RmkConfig::from_layers(layer, ConfigTree::new(), ConfigTree::new());

        let now = now!();
        let records = Controller::new(config).check_spoolfiles(now);
        assert_eq!(records.len(), 2);

        let fresh = &records[0];
        assert_eq!(fresh.suite_id, "fresh");
        assert_eq!(fresh.cache_time, 60);
        assert!(fresh.mtime > 0);
        assert!(!fresh.is_stale());

        let missing = &records[1];
        assert_eq!(missing.suite_id, "missing");
        assert_eq!(missing.mtime, MTIME_MISSING);
        assert_eq!(missing.overdue, now + 1 - 120);
    }

    #[test]
    fn test_oversized_cache_time_skips_suite() {
        let mut global = ConfigTree::new();
        global.insert(keys::CACHE_TIME, "300000000000000000d");
        global.insert(keys::OUTPUTDIR, "/tmp/robot");
        let mut layer = ConfigTree::new();
        layer.insert(keys::GLOBAL, global);
        layer.set_path(&[keys::SUITES, "broken"], ConfigTree::new().into());
        layer.set_path(&[keys::SUITES, "web", keys::CACHE_TIME], Setting::Int(60));
        let config = RmkConfig::from_layers(layer, ConfigTree::new(), ConfigTree::new());

        let records = Controller::new(config).check_spoolfiles(now!());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].suite_id, "web");
    }

    #[test]
    fn test_no_suites_no_records() {
        let config = RmkConfig::from_layers(ConfigTree::new(), ConfigTree::new(), ConfigTree::new());
        assert!(Controller::new(config).check_spoolfiles(now!()).is_empty());
    }
}
