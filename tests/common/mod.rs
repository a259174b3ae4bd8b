#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub const TERRESTRIAL_LINE: &str =
    "    Extraterrestrial = 1378.56     Terrestrial =  886.37     Atmospheric Transmittance = 0.6430";

static SERIAL: Mutex<()> = Mutex::new(());

/// Tests of one binary that write and exec scripts take turns, so no script
/// is executed while another thread still holds it open for writing.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Terrestrial,
    Zenith,
    Turbidity,
    Unrecognized,
    Hang,
    Crash,
}

impl Outcome {
    fn script(&self) -> String {
        match self {
            Outcome::Terrestrial => format!(
                "echo '{}' > smarts295.out.txt\n    echo 'extinction' > smarts295.ext.txt\n    echo 'scan' > smarts295.scn.txt",
                TERRESTRIAL_LINE
            ),
            Outcome::Zenith => {
                "echo ' ** ERROR: Zenith angle = 101.3 > 90 deg. RUN ABORTED!' > smarts295.out.txt"
                    .to_string()
            }
            Outcome::Turbidity => "echo ' ** the turbidity is too large' > smarts295.out.txt".to_string(),
            Outcome::Unrecognized => "echo 'SMARTS, version 2.9.5' > smarts295.out.txt".to_string(),
            Outcome::Hang => "sleep 30".to_string(),
            Outcome::Crash => "exit 1".to_string(),
        }
    }
}

/// Stand-in for smarts295bat. The outcome is picked from the row id found in
/// the comment card of the staged input.
pub fn install_fake_smarts(dir: &Path, outcomes: &[(&str, Outcome)]) -> PathBuf {
    fs::create_dir_all(dir).unwrap();

    let mut script = String::from(
        "#!/bin/sh\npwd > last_cwd.txt\nfirst=$(head -n 1 smarts295.inp.txt)\ncase \"$first\" in\n",
    );
    for (row, outcome) in outcomes {
        script.push_str(&format!("  *{}*)\n    {}\n    ;;\n", row, outcome.script()));
    }
    script.push_str("esac\n");

    let path = dir.join("smarts295bat");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Writes a bare input document whose first card carries the row id.
pub fn write_document(dir: &Path, run_id: &str, row: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(format!("{}_{}.inp.txt", run_id, row));
    fs::write(&path, format!("'{}_allbirds'\n2\n", row)).unwrap();
    path
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
