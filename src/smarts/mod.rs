use std::path::Path;

pub mod batch_runner;
pub mod batch_writer;
pub mod input_deck;
pub mod process;
pub mod report;
pub mod results;
pub mod workdir;

pub use batch_runner::BatchRunner;
pub use batch_writer::BatchWriter;
pub use input_deck::{InputDeckEncoder, InputDocument};
pub use results::{ResultCode, write_results};

/// The only input file name SMARTS reads, relative to its own directory.
pub const INPUT_FILE: &str = "smarts295.inp.txt";

/// Printed report, the one that carries the outcome markers.
pub const REPORT_FILE: &str = "smarts295.out.txt";

/// Fixed output names and the tag each gets once archived.
pub const OUTPUT_FILES: [(&str, &str); 3] = [
    ("out", REPORT_FILE),
    ("ext", "smarts295.ext.txt"),
    ("scn", "smarts295.scn.txt"),
];

pub const INPUT_SUFFIX: &str = ".inp.txt";

pub fn is_input_document(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(INPUT_SUFFIX) && name.len() > INPUT_SUFFIX.len())
}

/// `birds_000042.inp.txt` -> `birds_000042`
pub fn document_stem(path: &Path) -> Option<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(INPUT_SUFFIX))
        .filter(|stem| !stem.is_empty())
}
