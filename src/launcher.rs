//! Helper program launcher
//!
//! Every helper except the topology dumper is started detached. The dumper runs
//! to completion so its report can be opened afterwards.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::constants::tools;
use crate::sync::{Notice, Notifier};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} failed with exit code {}", describe_code(.code))]
    ExitStatus { program: String, code: Option<i32> },

    #[error("no new .{} file was generated in {}", tools::ARTIFACT_EXTENSION, .dir.display())]
    ArtifactMissing { dir: PathBuf },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

/// Program invocation handed to a `ProcessRunner`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Give the program its own console window
    pub new_console: bool,
}

impl Launch {
    fn plain(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            new_console: false,
        }
    }

    /// Ask the shell to start `target` with administrator rights
    fn elevated(target: &Path) -> Self {
        Self {
            program: PathBuf::from(tools::ELEVATION_SHELL),
            args: vec![
                "-Command".to_string(),
                format!("Start-Process \"{}\" -Verb RunAs", target.display()),
            ],
            new_console: false,
        }
    }
}

/// Outcome of a blocking run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub success: bool,
    pub code: Option<i32>,
}

/// Capability to start external programs
pub trait ProcessRunner {
    /// Start without waiting
    fn spawn(&self, launch: &Launch) -> io::Result<()>;

    /// Run to completion in `cwd`
    fn run(&self, program: &Path, cwd: &Path) -> io::Result<RunStatus>;

    /// Open a file or folder with its default handler
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// `std::process` backed runner
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[cfg(windows)]
fn set_new_console(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;
    command.creation_flags(CREATE_NEW_CONSOLE);
}

#[cfg(not(windows))]
fn set_new_console(_command: &mut Command) {}

#[cfg(windows)]
const OPENER: &str = "explorer";
#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(not(any(windows, target_os = "macos")))]
const OPENER: &str = "xdg-open";

impl ProcessRunner for SystemRunner {
    fn spawn(&self, launch: &Launch) -> io::Result<()> {
        let mut command = Command::new(&launch.program);
        command.args(&launch.args);
        if launch.new_console {
            set_new_console(&mut command);
        }
        let child = command.spawn()?;
        debug!(pid = child.id(), program = %launch.program.display(), "Spawned detached process");
        Ok(())
    }

    fn run(&self, program: &Path, cwd: &Path) -> io::Result<RunStatus> {
        let status = Command::new(program).current_dir(cwd).status()?;
        Ok(RunStatus {
            success: status.success(),
            code: status.code(),
        })
    }

    fn open(&self, path: &Path) -> io::Result<()> {
        Command::new(OPENER).arg(path).spawn().map(|_| ())
    }
}

/// Helper programs shipped next to CoreCycler
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Tool {
    /// Run CoreCycler itself (elevated)
    CoreCycler,
    BoostTester,
    /// PBO2 Tuner (elevated)
    Pbo2Tuner,
    /// Intel Voltage Control (elevated)
    IntelVoltageControl,
    CoreTunerX,
    /// Enable Windows performance counters (elevated)
    PerformanceCounters,
    /// Dump the CPU topology and open the report
    Apicid,
    /// Open the helper scripts folder, creating it if needed
    Helpers,
}

impl Tool {
    pub fn label(self) -> &'static str {
        match self {
            Tool::CoreCycler => "CoreCycler",
            Tool::BoostTester => "BoostTester",
            Tool::Pbo2Tuner => "PBO2Tuner",
            Tool::IntelVoltageControl => "IntelVoltageControl",
            Tool::CoreTunerX => "CoreTunerX",
            Tool::PerformanceCounters => "PerformanceCounters",
            Tool::Apicid => "APICID",
            Tool::Helpers => "helpers folder",
        }
    }
}

/// What a successful launch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Started,
    Opened(PathBuf),
}

pub struct ToolLauncher<R> {
    base_dir: PathBuf,
    runner: R,
}

impl<R: ProcessRunner> ToolLauncher<R> {
    /// Tool paths are resolved against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            base_dir: base_dir.into(),
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn launch(&self, tool: Tool) -> Result<LaunchOutcome, LaunchError> {
        let path = |relative: &str| self.base_dir.join(relative);
        let launch = match tool {
            Tool::CoreCycler => Launch::elevated(&path(tools::CORE_CYCLER)),
            Tool::BoostTester => Launch {
                new_console: true,
                ..Launch::plain(path(tools::BOOST_TESTER))
            },
            Tool::Pbo2Tuner => Launch::elevated(&path(tools::PBO2_TUNER)),
            Tool::IntelVoltageControl => Launch::elevated(&path(tools::INTEL_VOLTAGE_CONTROL)),
            Tool::CoreTunerX => Launch::plain(path(tools::CORE_TUNER_X)),
            Tool::PerformanceCounters => Launch::elevated(&path(tools::PERFORMANCE_COUNTERS)),
            Tool::Apicid => return self.run_apicid().map(LaunchOutcome::Opened),
            Tool::Helpers => return self.open_helpers().map(LaunchOutcome::Opened),
        };

        self.runner
            .spawn(&launch)
            .map_err(|source| LaunchError::Spawn {
                program: launch.program.display().to_string(),
                source,
            })?;
        info!(tool = tool.label(), program = %launch.program.display(), "Launched tool");
        Ok(LaunchOutcome::Started)
    }

    /// Launch and report any failure to the user
    pub fn launch_reporting(&self, tool: Tool, notifier: &dyn Notifier) -> Option<LaunchOutcome> {
        match self.launch(tool) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(tool = tool.label(), error = %e, "Launch failed");
                notifier.notify(Notice::LaunchFailed {
                    tool: tool.label().to_string(),
                    message: e.to_string(),
                });
                None
            }
        }
    }

    fn run_apicid(&self) -> Result<PathBuf, LaunchError> {
        let dir = self.base_dir.join(tools::APICID_DIR);
        let program = dir.join(tools::APICID_EXE);
        let before = text_files(&dir)?;

        let status = self
            .runner
            .run(&program, &dir)
            .map_err(|source| LaunchError::Spawn {
                program: program.display().to_string(),
                source,
            })?;
        if !status.success {
            return Err(LaunchError::ExitStatus {
                program: tools::APICID_EXE.to_string(),
                code: status.code,
            });
        }
        info!(program = %program.display(), "Topology dump finished");

        let expected = dir.join(tools::APICID_ARTIFACT);
        let report = if expected.is_file() {
            expected
        } else {
            let after = text_files(&dir)?;
            after
                .difference(&before)
                .next()
                .cloned()
                .ok_or_else(|| LaunchError::ArtifactMissing { dir: dir.clone() })?
        };

        self.open(&report)?;
        Ok(report)
    }

    fn open_helpers(&self) -> Result<PathBuf, LaunchError> {
        let dir = self.base_dir.join(tools::HELPERS_DIR);
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir).map_err(|source| LaunchError::Io {
                path: dir.clone(),
                source,
            })?;
            info!(path = %dir.display(), "Created helpers folder");
        }
        self.open(&dir)?;
        Ok(dir)
    }

    fn open(&self, path: &Path) -> Result<(), LaunchError> {
        self.runner.open(path).map_err(|source| LaunchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Opened");
        Ok(())
    }
}

/// Files in `dir` with the report extension; a missing directory has none
fn text_files(dir: &Path) -> Result<BTreeSet<PathBuf>, LaunchError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(source) => {
            return Err(LaunchError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut files = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|source| LaunchError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_report = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(tools::ARTIFACT_EXTENSION));
        if is_report && path.is_file() {
            files.insert(path);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::notice::RecordingNotifier;
    use std::cell::RefCell;

    /// Records calls; `run` optionally drops a file into the working directory
    #[derive(Default)]
    struct FakeRunner {
        spawned: RefCell<Vec<Launch>>,
        opened: RefCell<Vec<PathBuf>>,
        creates: Option<&'static str>,
        exit_code: i32,
        fail_spawn: bool,
    }

    impl ProcessRunner for FakeRunner {
        fn spawn(&self, launch: &Launch) -> io::Result<()> {
            if self.fail_spawn {
                return Err(io::Error::new(io::ErrorKind::NotFound, "program not found"));
            }
            self.spawned.borrow_mut().push(launch.clone());
            Ok(())
        }

        fn run(&self, _program: &Path, cwd: &Path) -> io::Result<RunStatus> {
            if let Some(name) = self.creates {
                std::fs::write(cwd.join(name), "Core 0: APIC ID 0\n")?;
            }
            Ok(RunStatus {
                success: self.exit_code == 0,
                code: Some(self.exit_code),
            })
        }

        fn open(&self, path: &Path) -> io::Result<()> {
            self.opened.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    fn tools_dir(base: &Path) -> PathBuf {
        let dir = base.join(tools::APICID_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_elevated_launch_goes_through_shell() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = ToolLauncher::new(dir.path(), FakeRunner::default());

        assert_eq!(launcher.launch(Tool::Pbo2Tuner).unwrap(), LaunchOutcome::Started);

        let spawned = launcher.runner().spawned.borrow();
        assert_eq!(spawned[0].program, PathBuf::from("powershell"));
        assert_eq!(spawned[0].args[0], "-Command");
        assert!(spawned[0].args[1].starts_with("Start-Process \""));
        assert!(spawned[0].args[1].ends_with("\" -Verb RunAs"));
    }

    #[test]
    fn test_boost_tester_gets_own_console() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = ToolLauncher::new(dir.path(), FakeRunner::default());
        launcher.launch(Tool::BoostTester).unwrap();
        launcher.launch(Tool::CoreTunerX).unwrap();

        let spawned = launcher.runner().spawned.borrow();
        assert!(spawned[0].new_console);
        assert!(!spawned[1].new_console);
    }

    #[test]
    fn test_apicid_opens_expected_report() {
        let dir = tempfile::tempdir().unwrap();
        let tools = tools_dir(dir.path());
        std::fs::write(tools.join("readme.txt"), "").unwrap();
        let runner = FakeRunner {
            creates: Some("APICID.txt"),
            ..FakeRunner::default()
        };
        let launcher = ToolLauncher::new(dir.path(), runner);

        let report = launcher.launch(Tool::Apicid).unwrap();
        assert_eq!(report, LaunchOutcome::Opened(tools.join("APICID.txt")));
    }

    #[test]
    fn test_apicid_falls_back_to_new_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let tools = tools_dir(dir.path());
        std::fs::write(tools.join("old.txt"), "").unwrap();
        let runner = FakeRunner {
            creates: Some("topology-2024.TXT"),
            ..FakeRunner::default()
        };
        let launcher = ToolLauncher::new(dir.path(), runner);

        launcher.launch(Tool::Apicid).unwrap();
        assert_eq!(
            *launcher.runner().opened.borrow(),
            vec![tools.join("topology-2024.TXT")]
        );
    }

    #[test]
    fn test_apicid_without_report_fails() {
        let dir = tempfile::tempdir().unwrap();
        tools_dir(dir.path());
        let launcher = ToolLauncher::new(dir.path(), FakeRunner::default());

        let err = launcher.launch(Tool::Apicid).unwrap_err();
        assert!(matches!(err, LaunchError::ArtifactMissing { .. }));
        assert!(launcher.runner().opened.borrow().is_empty());
    }

    #[test]
    fn test_apicid_non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        tools_dir(dir.path());
        let runner = FakeRunner {
            creates: Some("APICID.txt"),
            exit_code: 3,
            ..FakeRunner::default()
        };
        let launcher = ToolLauncher::new(dir.path(), runner);

        let err = launcher.launch(Tool::Apicid).unwrap_err();
        assert!(matches!(err, LaunchError::ExitStatus { code: Some(3), .. }));
        assert_eq!(err.to_string(), "APICID.exe failed with exit code 3");
    }

    #[test]
    fn test_helpers_folder_created_then_opened() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = ToolLauncher::new(dir.path(), FakeRunner::default());

        launcher.launch(Tool::Helpers).unwrap();

        let helpers = dir.path().join("helpers");
        assert!(helpers.is_dir());
        assert_eq!(*launcher.runner().opened.borrow(), vec![helpers]);
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner {
            fail_spawn: true,
            ..FakeRunner::default()
        };
        let launcher = ToolLauncher::new(dir.path(), runner);
        let notifier = RecordingNotifier::default();

        assert!(launcher.launch_reporting(Tool::CoreCycler, &notifier).is_none());
        let notices = notifier.notices();
        assert!(matches!(&notices[..], [Notice::LaunchFailed { tool, .. }] if tool == "CoreCycler"));
    }
}
