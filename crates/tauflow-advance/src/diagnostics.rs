//! Append-only reduction logs for the causality enforcers.
//!
//! Every worker may record a reduction factor for the cell it is
//! processing. Records travel over an unbounded crossbeam channel to one
//! drain thread that owns the file, so workers never contend on I/O. The
//! file is opened in append mode on the first record; a log that never
//! receives a record never touches the filesystem.
//!
//! Line format: `{factor:>18.8e}   {ε:.8e}   {τ:.8e}`.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

/// Errors from the reduction-log drain thread.
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    /// Opening or writing the log file failed.
    #[error("reduction log {path}: {source}")]
    Io {
        /// The log file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The drain thread could not be spawned.
    #[error("failed to spawn reduction-log thread: {0}")]
    Spawn(#[source] io::Error),
    /// The drain thread is gone (it panicked or already failed).
    #[error("reduction-log thread disconnected")]
    Disconnected,
}

/// One line of a reduction log.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReductionRecord {
    /// The applied rescaling factor.
    pub factor: f64,
    /// Local energy density of the cell.
    pub epsilon: f64,
    /// Proper time of the step.
    pub tau: f64,
}

impl ReductionRecord {
    /// Render the record as one log line, without the newline.
    pub fn to_line(&self) -> String {
        format!("{:>18.8e}   {:.8e}   {:.8e}", self.factor, self.epsilon, self.tau)
    }
}

enum LogMessage {
    Record(ReductionRecord),
    Flush(Sender<Result<(), DiagnosticsError>>),
}

/// Handle to one reduction log.
///
/// Cheap to share by reference across rayon workers: [`record`]
/// only sends on a channel.
///
/// [`record`]: ReductionLog::record
#[derive(Debug)]
pub struct ReductionLog {
    tx: Option<Sender<LogMessage>>,
    drain: Option<JoinHandle<Result<(), DiagnosticsError>>>,
    threshold: f64,
}

impl ReductionLog {
    /// Start a drain thread writing to `path`. Only records with
    /// `epsilon > threshold` are kept.
    pub fn open(path: impl Into<PathBuf>, threshold: f64) -> Result<Self, DiagnosticsError> {
        let path = path.into();
        let (tx, rx) = crossbeam_channel::unbounded();
        let name = format!(
            "tauflow-log-{}",
            path.file_stem().and_then(|s| s.to_str()).unwrap_or("reduction")
        );
        let drain = thread::Builder::new()
            .name(name)
            .spawn(move || run_drain(&path, rx))
            .map_err(DiagnosticsError::Spawn)?;
        Ok(Self {
            tx: Some(tx),
            drain: Some(drain),
            threshold,
        })
    }

    /// A log that discards every record.
    pub fn disabled() -> Self {
        Self {
            tx: None,
            drain: None,
            threshold: f64::INFINITY,
        }
    }

    /// Whether records are being kept.
    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue a record if the cell is above the energy threshold.
    pub fn record(&self, factor: f64, epsilon: f64, tau: f64) {
        if epsilon <= self.threshold {
            return;
        }
        if let Some(tx) = &self.tx {
            // A closed channel means the drain thread already failed; the
            // error surfaces from flush() or close().
            let _ = tx.send(LogMessage::Record(ReductionRecord {
                factor,
                epsilon,
                tau,
            }));
        }
    }

    /// Block until every record sent so far is written to the file.
    pub fn flush(&self) -> Result<(), DiagnosticsError> {
        let Some(tx) = &self.tx else {
            return Ok(());
        };
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        tx.send(LogMessage::Flush(reply_tx))
            .map_err(|_| DiagnosticsError::Disconnected)?;
        reply_rx.recv().map_err(|_| DiagnosticsError::Disconnected)?
    }

    /// Stop the drain thread after it has written every queued record.
    pub fn close(mut self) -> Result<(), DiagnosticsError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), DiagnosticsError> {
        self.tx.take();
        match self.drain.take() {
            Some(handle) => handle.join().map_err(|_| DiagnosticsError::Disconnected)?,
            None => Ok(()),
        }
    }
}

impl Drop for ReductionLog {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("{e}");
        }
    }
}

fn run_drain(path: &Path, rx: Receiver<LogMessage>) -> Result<(), DiagnosticsError> {
    let io_err = |source| DiagnosticsError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer: Option<BufWriter<File>> = None;
    for message in rx {
        match message {
            LogMessage::Record(record) => {
                if writer.is_none() {
                    let file = OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)
                        .map_err(io_err)?;
                    writer = Some(BufWriter::new(file));
                }
                if let Some(w) = writer.as_mut() {
                    writeln!(w, "{}", record.to_line()).map_err(io_err)?;
                }
            }
            LogMessage::Flush(reply) => {
                let result = match &mut writer {
                    Some(w) => w.flush().map_err(io_err),
                    None => Ok(()),
                };
                let _ = reply.send(result);
            }
        }
    }
    if let Some(mut w) = writer {
        w.flush().map_err(io_err)?;
    }
    Ok(())
}
