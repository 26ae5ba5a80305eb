pub mod error;
pub mod timeunit;

/// Seconds since the Unix epoch.
#[macro_export]
macro_rules! now {
    () => {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or_default()
    };
}

/// Wall-clock time used for suite start/end records.
pub fn local_now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
