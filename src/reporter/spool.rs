use crate::app::suite::Suite;
use crate::error::Error;
use chrono::NaiveDateTime;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Reported by [`SpoolStore::mtime`] when there is no readable spool file.
pub const MTIME_MISSING: i64 = -1;

/// Outcome of the most recent execution of one suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpoolRecord {
    pub last_start_time: Option<NaiveDateTime>,
    pub last_end_time: Option<NaiveDateTime>,
    pub last_rc: Option<i32>,
    pub xml: PathBuf,
    pub htmllog: PathBuf,
}

impl From<&Suite> for SpoolRecord {
    fn from(suite: &Suite) -> Self {
        Self {
            last_start_time: suite.start_time,
            last_end_time: suite.end_time,
            last_rc: suite.rc,
            xml: suite.outfile_xml().unwrap_or_default(),
            htmllog: suite.outfile_htmllog().unwrap_or_default(),
        }
    }
}

/// Spool files of one output directory, one `robotmk_<id>.json` per suite.
#[derive(Debug, Clone)]
pub struct SpoolStore {
    outputdir: PathBuf,
}

impl SpoolStore {
    pub fn new<P: Into<PathBuf>>(outputdir: P) -> Self {
        Self {
            outputdir: outputdir.into(),
        }
    }

    pub fn for_suite(suite: &Suite) -> Result<Self, Error> {
        suite.outputdir().map(Self::new)
    }

    pub fn path(&self, suite_id: &str) -> PathBuf {
        self.outputdir.join(format!("robotmk_{}.json", suite_id))
    }

    /// Replaces the spool file of `suite` with its current state.
    pub fn write(&self, suite: &Suite) -> Result<PathBuf, Error> {
        fs::create_dir_all(&self.outputdir)?;
        let path = self.path(&suite.id);
        let mut document = BTreeMap::new();
        document.insert(suite.id.as_str(), SpoolRecord::from(suite));
        serde_json::to_writer_pretty(File::create(&path)?, &document)?;
        debug!("Wrote spool file {}", path.display());
        Ok(path)
    }

    pub fn read(&self, suite_id: &str) -> Result<SpoolRecord, Error> {
        let path = self.path(suite_id);
        let mut document: BTreeMap<String, SpoolRecord> =
            serde_json::from_reader(File::open(&path)?)?;
        document.remove(suite_id).ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} holds no record of suite {}", path.display(), suite_id),
            ))
        })
    }

    /// Modification time of the spool file in seconds since the epoch, or
    /// [`MTIME_MISSING`].
    pub fn mtime(&self, suite_id: &str) -> i64 {
        modified_secs(&self.path(suite_id)).unwrap_or(MTIME_MISSING)
    }
}

fn modified_secs(path: &Path) -> Option<i64> {
    let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok()?;
    let elapsed = modified.duration_since(UNIX_EPOCH).ok()?;
    Some(elapsed.as_secs() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::constants::keys;
    use crate::configuration::loader::RmkConfig;
    use crate::configuration::tree::ConfigTree;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn executed_suite(outputdir: &Path) -> Suite {
        let mut global = ConfigTree::new();
        global.insert(keys::CACHE_TIME, 900i64);
        global.insert(keys::OUTPUTDIR, outputdir.to_string_lossy().into_owned());
        let mut layer = ConfigTree::new();
        layer.insert(keys::GLOBAL, global);
        layer.insert(keys::SUITES, ConfigTree::from_path(&["web_shop"], ConfigTree::new().into()));
        let config = RmkConfig::from_layers(layer, ConfigTree::new(), ConfigTree::new());

        let mut suite = Suite::new("web_shop", &config).unwrap();
        suite.settings_mut().insert(keys::OUTPUT, "out.xml");
        suite.settings_mut().insert(keys::LOG, "log.html");
        suite.start_time = Some(NaiveDate::from_ymd(2020, 9, 1).and_hms(10, 0, 0));
        suite.end_time = Some(NaiveDate::from_ymd(2020, 9, 1).and_hms(10, 2, 30));
        suite.rc = Some(1);
        suite
    }

    #[test]
    fn test_written_record_reads_back() {
        let dir = TempDir::new().unwrap();
        let outputdir = dir.path().join("nested");
        let suite = executed_suite(&outputdir);
        let store = SpoolStore::for_suite(&suite).unwrap();

        let path = store.write(&suite).unwrap();
        assert_eq!(path, outputdir.join("robotmk_web_shop.json"));

        let record = store.read("web_shop").unwrap();
        assert_eq!(record, SpoolRecord::from(&suite));
        assert_eq!(record.last_rc, Some(1));
        assert_eq!(record.xml, outputdir.join("out.xml"));
        assert_eq!(record.htmllog, outputdir.join("log.html"));
    }

    #[test]
    fn test_json_shape() {
        let dir = TempDir::new().unwrap();
        let suite = executed_suite(dir.path());
        let path = SpoolStore::new(dir.path()).write(&suite).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        let record = &json["web_shop"];
        assert_eq!(record["last_start_time"], "2020-09-01T10:00:00");
        assert_eq!(record["last_end_time"], "2020-09-01T10:02:30");
        assert_eq!(record["last_rc"], 1);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = SpoolStore::new(dir.path());
        let mut suite = executed_suite(dir.path());
        store.write(&suite).unwrap();
        suite.rc = Some(0);
        store.write(&suite).unwrap();
        assert_eq!(store.read("web_shop").unwrap().last_rc, Some(0));
    }

    #[test]
    fn test_unexecuted_suite_has_nulls() {
        let dir = TempDir::new().unwrap();
        let mut suite = executed_suite(dir.path());
        suite.start_time = None;
        suite.end_time = None;
        suite.rc = None;
        let path = SpoolStore::new(dir.path()).write(&suite).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert!(json["web_shop"]["last_rc"].is_null());
        assert!(json["web_shop"]["last_start_time"].is_null());
    }

    #[test]
    fn test_mtime() {
        let dir = TempDir::new().unwrap();
        let store = SpoolStore::new(dir.path());
        assert_eq!(store.mtime("web_shop"), MTIME_MISSING);

        store.write(&executed_suite(dir.path())).unwrap();
        let mtime = store.mtime("web_shop");
        assert!((mtime - now!()).abs() < 60, "mtime {} too far from now", mtime);
    }
}
