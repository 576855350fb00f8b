use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use log::{debug, info, warn};

pub const DESKTOP_FILE: &str = "com.inform7.IDE.desktop";

/// One external maintenance command run after installation.
#[derive(Clone, Debug, PartialEq)]
pub struct MaintenanceStep {
    pub message: &'static str,
    pub program: &'static str,
    pub args: Vec<OsString>,
}

pub trait StepRunner {
    /// Runs the step. Failures are the runner's to report; they never reach the caller.
    fn run(&mut self, step: &MaintenanceStep);
}

pub struct SystemRunner;

impl StepRunner for SystemRunner {
    fn run(&mut self, step: &MaintenanceStep) {
        let status = Command::new(step.program)
            .args(&step.args)
            .status();

        match status {
            Ok(status) if status.success() => debug!("{0} finished", step.program),
            Ok(status) => warn!("{0} exited with code {1:?}", step.program, status.code()),
            Err(err) => warn!("Could not run {0}: {1}", step.program, err),
        }
    }
}

pub fn maintenance_steps<P: AsRef<Path>>(datadir: P) -> Vec<MaintenanceStep> {
    let datadir = datadir.as_ref();

    vec![
        MaintenanceStep {
            message: "Update icon cache...",
            program: "gtk-update-icon-cache",
            args: vec![
                OsString::from("-f"),
                OsString::from("-t"),
                datadir.join("icons").join("hicolor").into_os_string(),
            ],
        },
        MaintenanceStep {
            message: "Compile gsettings schemas...",
            program: "glib-compile-schemas",
            args: vec![datadir.join("glib-2.0").join("schemas").into_os_string()],
        },
        MaintenanceStep {
            message: "Validate desktop file...",
            program: "desktop-file-validate",
            args: vec![datadir.join("applications").join(DESKTOP_FILE).into_os_string()],
        },
        MaintenanceStep {
            message: "Update mime database...",
            program: "update-mime-database",
            args: vec![datadir.join("mime").into_os_string()],
        },
    ]
}

/// Returns how many steps were attempted; zero when installing into a staging root.
pub fn run_post_install<P: AsRef<Path>, R: StepRunner>(
    datadir: P,
    destdir: Option<&str>,
    runner: &mut R,
) -> usize {
    if let Some(destdir) = destdir.filter(|dir| !dir.is_empty()) {
        info!("Installing into staging root {destdir}, skipping post-install steps");
        return 0;
    }

    let steps = maintenance_steps(datadir);
    for step in &steps {
        info!("{}", step.message);
        runner.run(step);
    }

    steps.len()
}
