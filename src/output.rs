use crate::error::Error;
use crate::field::Field;
use crate::grid::Grid;
use crossbeam_channel::Sender;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::thread;




/**
 * The conserved state of a run at one iteration, with enough metadata to
 * interpret it: the grid, and the names of the stored components.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub iteration: u64,
    pub time: f64,
    pub grid: Grid,
    pub variable_names: Vec<String>,
    pub field: Field,
}




// ============================================================================
pub fn snapshot_path(directory: &Path, prefix: &str, iteration: u64) -> PathBuf {
    directory.join(format!("{}_{:07}.cbor", prefix, iteration))
}

pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut buffer = BufWriter::new(file);
    ciborium::ser::into_writer(snapshot, &mut buffer).map_err(|e| Error::Serialization(format!("{:?}", e)))
}

pub fn read_snapshot(path: &Path) -> Result<Snapshot, Error> {
    let file = File::open(path)?;
    ciborium::de::from_reader(BufReader::new(file)).map_err(|e| Error::Serialization(format!("{:?}", e)))
}




/**
 * Writes snapshots on a background thread, so the solver does not wait on
 * the file system. Snapshots are written in the order they are submitted.
 */
pub struct OutputWriter {
    sink: Option<Sender<Snapshot>>,
    thread: Option<thread::JoinHandle<Result<usize, Error>>>,
}




// ============================================================================
impl OutputWriter {

    /// Start the writer thread, creating the output directory if needed.
    ///
    pub fn new(directory: &str, prefix: &str) -> Result<Self, Error> {
        std::fs::create_dir_all(directory)?;

        let (sink, source) = crossbeam_channel::unbounded::<Snapshot>();
        let directory = PathBuf::from(directory);
        let prefix = prefix.to_string();

        let thread = thread::spawn(move || {
            let mut count = 0;

            for snapshot in source {
                let path = snapshot_path(&directory, &prefix, snapshot.iteration);
                match write_snapshot(&snapshot, &path) {
                    Ok(()) => {
                        info!("write {}", path.display());
                        count += 1;
                    }
                    Err(e) => {
                        error!("failed to write {}: {}", path.display(), e);
                        return Err(e);
                    }
                }
            }
            Ok(count)
        });

        Ok(Self {
            sink: Some(sink),
            thread: Some(thread),
        })
    }

    /// Queue a snapshot for writing. Returns false if the writer thread has
    /// stopped after a failure.
    ///
    pub fn submit(&self, snapshot: Snapshot) -> bool {
        match &self.sink {
            Some(sink) => sink.send(snapshot).is_ok(),
            None => false,
        }
    }

    /// Wait for every queued snapshot to be written, and return how many
    /// were, or the first write error.
    ///
    pub fn finish(mut self) -> Result<usize, Error> {
        self.join()
    }

    fn join(&mut self) -> Result<usize, Error> {
        self.sink.take();

        match self.thread.take() {
            Some(thread) => thread
                .join()
                .unwrap_or_else(|_| Err(Error::Serialization("output thread panicked".to_string()))),
            None => Ok(0),
        }
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        if let Err(e) = self.join() {
            error!("{}", e);
        }
    }
}
