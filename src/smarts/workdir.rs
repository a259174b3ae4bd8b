use log::{debug, error};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

// The process working directory is global, and so is the SMARTS directory.
fn workdir_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Holds the process inside the SMARTS directory until dropped.
///
/// Only one guard exists at a time; a second `enter` blocks until the first
/// guard is dropped. Dropping restores the directory that was current when
/// the guard was created, on every exit path.
pub struct WorkdirGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl WorkdirGuard {
    pub fn enter<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let lock = workdir_lock()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = env::current_dir()?;
        env::set_current_dir(dir.as_ref())?;
        debug!(
            "entered {} (was {})",
            dir.as_ref().display(),
            previous.display()
        );
        Ok(Self {
            previous,
            _lock: lock,
        })
    }

    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        match env::set_current_dir(&self.previous) {
            Ok(()) => debug!("restored working directory {}", self.previous.display()),
            Err(e) => error!(
                "could not restore working directory {}: {}",
                self.previous.display(),
                e
            ),
        }
    }
}
