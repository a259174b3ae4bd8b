use log::{debug, error, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::error::RunError;

use super::process::{self, Invocation};
use super::report;
use super::results::{ResultCode, write_results};
use super::workdir::WorkdirGuard;
use super::{INPUT_FILE, INPUT_SUFFIX, OUTPUT_FILES, REPORT_FILE, document_stem, is_input_document};

/// Drives SMARTS once per input document, strictly one run at a time.
///
/// SMARTS only reads and writes fixed file names in its own directory, so
/// each document is copied in under [`INPUT_FILE`] and every output is moved
/// out to the archive directory before the next run starts.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    smarts_dir: PathBuf,
    program: PathBuf,
    input_dir: PathBuf,
    output_dir: PathBuf,
    timeout: Duration,
}

impl BatchRunner {
    pub fn new(config: &Config) -> Result<Self, RunError> {
        // All paths are made absolute because the runs happen from inside smarts_dir
        let smarts_dir = std::path::absolute(config.smarts_dir())?;
        let program = smarts_dir.join(config.executable());
        Ok(Self {
            program,
            smarts_dir,
            input_dir: std::path::absolute(config.input_dir())?,
            output_dir: std::path::absolute(config.output_dir())?,
            timeout: config.timeout(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Input documents of `run_id` in `input_dir`, sorted by name.
    pub fn discover(&self, run_id: &str) -> Result<Vec<PathBuf>, RunError> {
        let pattern = format!(
            "{}/{}_[0-9][0-9][0-9][0-9][0-9][0-9]{}",
            glob::Pattern::escape(&self.input_dir.to_string_lossy()),
            glob::Pattern::escape(run_id),
            INPUT_SUFFIX
        );

        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(glob::GlobError::into_error)?;
            if is_input_document(&path) {
                files.push(path);
            }
        }
        files.sort();

        info!("found {} input documents for run {}", files.len(), run_id);
        Ok(files)
    }

    pub fn run_batch(&self, run_id: &str, results_file: &Path) -> Result<Vec<ResultCode>, RunError> {
        let files = self.discover(run_id)?;
        self.process(&files, results_file)
    }

    /// Runs every file in order and writes the result table.
    ///
    /// The table is written even when the batch stops early, with whatever
    /// results were collected up to that point.
    /// Relative paths are taken against the caller's working directory, not
    /// against `smarts_dir`.
    pub fn process(&self, files: &[PathBuf], results_file: &Path) -> Result<Vec<ResultCode>, RunError> {
        let results_file = std::path::absolute(results_file)?;
        let files = files
            .iter()
            .map(std::path::absolute)
            .collect::<io::Result<Vec<_>>>()?;

        let mut results = Vec::with_capacity(files.len());
        let outcome = self.run_files(&files, &mut results);
        let flushed = write_results(&results, &results_file);

        if let Err(e) = &outcome {
            error!(
                "batch stopped after {} of {} files: {}",
                results.len(),
                files.len(),
                e
            );
        }
        outcome?;
        flushed?;

        Ok(results)
    }

    fn run_files(&self, files: &[PathBuf], results: &mut Vec<ResultCode>) -> Result<(), RunError> {
        fs::create_dir_all(&self.output_dir)?;
        let _guard = WorkdirGuard::enter(&self.smarts_dir)?;

        for (n, file) in files.iter().enumerate() {
            let code = self.run_one(file)?;
            info!(
                "[{}/{}] {} -> {}",
                n + 1,
                files.len(),
                file.display(),
                code
            );
            results.push(code);
        }

        Ok(())
    }

    fn run_one(&self, input: &Path) -> Result<ResultCode, RunError> {
        let document = fs::metadata(input).and_then(|meta| {
            if meta.is_file() {
                fs::read(input)
            } else {
                Err(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"))
            }
        });
        let document = match document {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("input file {} is not readable: {}", input.display(), e);
                return Ok(ResultCode::MissingInput);
            }
        };

        self.clear_outputs();

        // only a failure inside smarts_dir stops the batch
        let staged = self.smarts_dir.join(INPUT_FILE);
        fs::write(&staged, document).map_err(|source| RunError::Stage {
            path: staged.clone(),
            source,
        })?;

        let code = match process::run_with_timeout(&self.program, &self.smarts_dir, self.timeout) {
            Ok(Invocation::Exited(status)) => {
                if !status.success() {
                    warn!("{} exited with {} for {}", self.program.display(), status, input.display());
                }
                self.read_report()
            }
            Ok(Invocation::TimedOut) => ResultCode::TimedOut,
            Err(e) => {
                error!("could not run {}: {}", self.program.display(), e);
                ResultCode::Unclassified
            }
        };

        match document_stem(input) {
            Some(stem) => self.archive_outputs(stem),
            None => warn!("cannot derive an archive name from {}", input.display()),
        }

        Ok(code)
    }

    fn read_report(&self) -> ResultCode {
        match fs::read(self.smarts_dir.join(REPORT_FILE)) {
            Ok(bytes) => report::classify(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                warn!("no report from {}: {}", self.program.display(), e);
                ResultCode::Unclassified
            }
        }
    }

    // A previous crash may have left outputs behind; they must not be read as this run's.
    fn clear_outputs(&self) {
        for (_, name) in OUTPUT_FILES {
            let path = self.smarts_dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => debug!("removed stale {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("could not remove stale {}: {}", path.display(), e),
            }
        }
    }

    fn archive_outputs(&self, stem: &str) {
        for (tag, name) in OUTPUT_FILES {
            let from = self.smarts_dir.join(name);
            let to = self.output_dir.join(format!("{}.{}.txt", stem, tag));
            match move_file(&from, &to) {
                Ok(()) => debug!("archived {} as {}", from.display(), to.display()),
                // not every outcome produces all three files
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("no {} produced for {}", name, stem)
                }
                Err(e) => warn!("could not archive {}: {}", from.display(), e),
            }
        }
    }
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if !from.exists() {
        return Err(io::Error::from(io::ErrorKind::NotFound));
    }
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        // rename cannot cross filesystems
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
