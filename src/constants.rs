//! Application-wide constants
//!
//! Section names, option keys, defaults, bounds and helper-tool locations.
//! Everything that ends up in `config.ini` or on a command line is spelled here once.

/// Settings file location
pub mod config {
    /// Default settings file, resolved against the working directory
    pub const FILENAME: &str = "config.ini";

    /// Environment variable selecting the tracing level
    pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
}

/// INI section names
pub mod sections {
    pub const GENERAL: &str = "General";
    pub const AUTOMATIC_TEST_MODE: &str = "AutomaticTestMode";
    pub const PRIME95: &str = "Prime95";
    pub const PRIME95_CUSTOM: &str = "Prime95Custom";
    pub const LINPACK: &str = "Linpack";
    pub const YCRUNCHER: &str = "yCruncher";
    pub const AIDA64: &str = "Aida64";
    pub const UPDATE: &str = "Update";
}

/// Tokens written in place of a value
pub mod tokens {
    /// Written by an in-band "Custom" choice whose free text is empty
    pub const CUSTOM: &str = "Custom";

    /// Written for Prime95 mode while the custom checkbox is on and its text is empty
    pub const CUSTOM_LOWER: &str = "custom";

    /// Literal "let the program decide" value (startValues, yCruncher memory)
    pub const DEFAULT: &str = "Default";

    /// Runtime per core when the minute counter is zero
    pub const AUTO: &str = "auto";

    /// Unit suffix appended to runtime minutes
    pub const MINUTES_SUFFIX: &str = "m";

    /// Separator used for multi-select lists
    pub const LIST_SEPARATOR: &str = ", ";
}

/// Load-time bounds for numeric fields (inclusive)
pub mod bounds {
    pub const NUMBER_OF_THREADS: (i64, i64) = (1, 2);
    pub const MAX_ITERATIONS: (i64, i64) = (1, 10_000);
    pub const DELAY_BETWEEN_CORES: (i64, i64) = (0, 3_600);
    pub const RUNTIME_PER_CORE_MINUTES: (i64, i64) = (0, 1_440);
    pub const UPDATE_FREQUENCY_DAYS: (i64, i64) = (1, 365);
    pub const AUTOMATIC_MAX_VALUE: (i64, i64) = (-100, 100);
    pub const AUTOMATIC_INCREMENT_BY: (i64, i64) = (1, 100);
    pub const YCRUNCHER_TEST_DURATION: (i64, i64) = (1, 6_000);
    pub const YCRUNCHER_MEMORY: (f64, f64) = (0.0, 1_024.0);
    pub const AIDA64_MAX_MEMORY: (i64, i64) = (0, 100);
}

/// Hours per day, used by the update-frequency codec
pub const HOURS_PER_DAY: i64 = 24;

/// External helper programs, relative to the working directory
pub mod tools {
    pub const CORE_CYCLER: &str = "Run CoreCycler.bat";
    pub const BOOST_TESTER: &str = r"tools\BoostTester.sp00n.exe";
    pub const PBO2_TUNER: &str = r"tools\PBO2Tuner\PBO2Tuner.exe";
    pub const INTEL_VOLTAGE_CONTROL: &str = r"tools\IntelVoltageControl\IntelVoltageControl.exe";
    pub const CORE_TUNER_X: &str = r"tools\CoreTunerX.exe";
    pub const PERFORMANCE_COUNTERS: &str = r"tools\enable_performance_counter.bat";

    /// CPU topology dumper, run in its own directory
    pub const APICID_DIR: &str = "tools";
    pub const APICID_EXE: &str = "APICID.exe";

    /// File the topology dumper is expected to produce
    pub const APICID_ARTIFACT: &str = "APICID.txt";

    /// Extension of files considered when the expected artifact is missing
    pub const ARTIFACT_EXTENSION: &str = "txt";

    /// Folder opened by the "scripts" action (created on demand)
    pub const HELPERS_DIR: &str = "helpers";

    /// Shell used to request elevation
    pub const ELEVATION_SHELL: &str = "powershell";
}
