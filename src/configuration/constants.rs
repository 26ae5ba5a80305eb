pub mod cargo_env {
    pub const CARGO_PKG_NAME: &'static str = env!("CARGO_PKG_NAME");
}

pub mod environment {
    pub const PREFIX: &'static str = "ROBOTMK_";

    /// Setting names which contain underscores as part of the literal name.
    pub const PRESERVED_WORDS: &[&str] = &[
        "agent_output_encoding",
        "execution_mode",
        "log_rotation",
        "cache_time",
    ];

    /// Keys that can follow a suite id in a variable name.
    pub const SUITE_SUBKEYS: &[&str] = &[
        "name",
        "suite",
        "test",
        "include",
        "exclude",
        "critical",
        "noncritical",
        "variable",
        "variablefile",
        "exitonfailure",
        "host",
        "path",
        "cache_time",
    ];
}

pub mod keys {
    pub const GLOBAL: &'static str = "global";
    pub const SUITES: &'static str = "suites";

    pub const AGENT_CONFIG_DIR: &'static str = "agent_config_dir";
    pub const ROBOTMK_YML: &'static str = "robotmk_yml";
    pub const LOGDIR: &'static str = "logdir";
    pub const LOGGING: &'static str = "logging";
    pub const OUTPUTDIR: &'static str = "outputdir";
    pub const ROBOTDIR: &'static str = "robotdir";
    pub const CACHE_TIME: &'static str = "cache_time";

    pub const PATH: &'static str = "path";
    pub const VARIABLE: &'static str = "variable";
    pub const OUTPUT: &'static str = "output";
    pub const LOG: &'static str = "log";
    pub const REPORT: &'static str = "report";
}

pub mod common {
    pub const LOG_FILE_NAME: &'static str = "robotmk.log";
    pub const ROBOT_EXECUTABLE: &'static str = "robot";
    /// Result codes above this are engine failures rather than failed tests.
    pub const MAX_TEST_FAILURE_RC: i32 = 250;
    /// Reported when the engine could not be spawned or was killed.
    pub const ENGINE_CRASH_RC: i32 = 255;
    pub const SELECT_ALL: &'static str = "all";
    /// Runner options that take no value.
    pub const ROBOT_FLAGS: &[&str] = &[
        "dryrun",
        "exitonerror",
        "exitonfailure",
        "nostatusrc",
        "norpa",
        "rpa",
        "runemptysuite",
        "skipteardownonexit",
    ];
}
