use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::RunError;
use crate::observation::ObservationRecord;
use crate::smarts::batch_writer::row_id;
use crate::smarts::{BatchRunner, BatchWriter, InputDeckEncoder, ResultCode};
use crate::table::Table;

#[derive(Debug)]
pub struct RunSummary {
    pub results: Vec<ResultCode>,
    pub documents_written: usize,
    pub results_file: PathBuf,
}

impl RunSummary {
    pub fn successes(&self) -> usize {
        self.results.iter().filter(|code| code.is_success()).count()
    }
}

/// Writes one input document per table row and returns the path each row is
/// expected at, whether or not its document could be produced.
pub fn write_documents(config: &Config, table: &Table, run_id: &str) -> Result<(Vec<PathBuf>, usize), RunError> {
    let headers = config.aliases().resolve(table.headers());
    headers.ensure_required(config.aliases())?;

    let encoder = InputDeckEncoder::new(config.model().clone(), config.season_policy());
    let writer = BatchWriter::new(config.input_dir(), run_id);

    let mut written = 0;
    let mut expected = Vec::with_capacity(table.len());
    for (index, row) in table.rows().iter().enumerate() {
        expected.push(writer.path_for(index));

        let id = row_id(index);
        let document = ObservationRecord::from_record(row, &headers)
            .and_then(|record| encoder.encode(&record, &id));
        match document {
            Ok(document) => match writer.write(index, &document) {
                Ok(_) => written += 1,
                Err(e) => error!("could not write input for row {}: {}", id, e),
            },
            Err(e) => {
                warn!("skipping row {}: {}", id, e);
                // a document left by an earlier run must not stand in for this row
                if let Err(e) = writer.remove(index) {
                    error!(
                        "could not remove stale input {} for row {}: {}",
                        writer.path_for(index).display(),
                        id,
                        e
                    );
                }
            }
        }
    }

    info!(
        "wrote {} of {} input documents to {}",
        written,
        table.len(),
        writer.dir().display()
    );
    Ok((expected, written))
}

/// Full run: table → input documents → SMARTS batch → result table.
pub fn run<P: AsRef<Path>>(config: &Config, infile: P, run_id: &str) -> Result<RunSummary, RunError> {
    let table = Table::from_path(infile)?;
    let (expected, documents_written) = write_documents(config, &table, run_id)?;

    let runner = BatchRunner::new(config)?;
    let results_file = config.results_file(run_id);
    let results = runner.process(&expected, &results_file)?;

    Ok(RunSummary {
        results,
        documents_written,
        results_file,
    })
}
