use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::input_deck::InputDocument;
use super::INPUT_SUFFIX;

/// Six-digit row identifier used in every per-row file name.
pub fn row_id(index: usize) -> String {
    format!("{:06}", index)
}

/// `{run_id}_{row_id}`, the stem shared by a row's input and archived outputs.
pub fn file_stem(run_id: &str, index: usize) -> String {
    format!("{}_{}", run_id, row_id(index))
}

/// Persists input documents as `{run_id}_{NNNNNN}.inp.txt` in one directory.
#[derive(Debug, Clone)]
pub struct BatchWriter {
    dir: PathBuf,
    run_id: String,
}

impl BatchWriter {
    pub fn new<P: Into<PathBuf>>(dir: P, run_id: &str) -> Self {
        Self {
            dir: dir.into(),
            run_id: run_id.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir
            .join(format!("{}{}", file_stem(&self.run_id, index), INPUT_SUFFIX))
    }

    /// Writes (or overwrites) the document for one row.
    pub fn write(&self, index: usize, document: &InputDocument) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(index);
        fs::write(&path, document.render())?;
        debug!("wrote {}", path.display());
        Ok(path)
    }

    pub fn remove(&self, index: usize) -> io::Result<()> {
        match fs::remove_file(self.path_for(index)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
