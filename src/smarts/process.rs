use log::warn;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug)]
pub enum Invocation {
    Exited(ExitStatus),
    TimedOut,
}

/// Runs `program` inside `workdir` and waits at most `timeout` for it to exit.
/// A program still running at the deadline is killed.
pub fn run_with_timeout(program: &Path, workdir: &Path, timeout: Duration) -> io::Result<Invocation> {
    let mut child = Command::new(program)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let started_at = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Invocation::Exited(status));
        }
        if started_at.elapsed() >= timeout {
            warn!(
                "{} still running after {:?}, killing it",
                program.display(),
                timeout
            );
            // kill fails only if the child already exited
            let _ = child.kill();
            child.wait()?;
            return Ok(Invocation::TimedOut);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
