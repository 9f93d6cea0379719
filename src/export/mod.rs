mod layout;
mod pdf;
use self::layout::PrintLayout;
use crate::calendar::MonthGrid;
use crate::event::{Event, YMD_FMT};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use thiserror::Error;
use time::Date;

const MM_TO_PT: f32 = 72.0 / 25.4;

/// The month as it was last shown on screen: its grid and its events in
/// date order
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PrintSnapshot {
    grid: MonthGrid,
    events: Vec<Event>,
}

impl PrintSnapshot {
    pub(crate) fn new(grid: MonthGrid, mut events: Vec<Event>) -> PrintSnapshot {
        events.sort_by_key(|ev| ev.date);
        PrintSnapshot { grid, events }
    }
}

/// Page geometry, in points
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ExportOptions {
    pub(crate) page_width: f32,
    pub(crate) page_height: f32,
    pub(crate) margin: f32,
    /// Multiplier applied to every font size and spacing
    pub(crate) scale: f32,
}

impl Default for ExportOptions {
    /// A4 landscape with a 10 mm margin
    fn default() -> ExportOptions {
        ExportOptions {
            page_width: 297.0 * MM_TO_PT,
            page_height: 210.0 * MM_TO_PT,
            margin: 10.0 * MM_TO_PT,
            scale: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Exporter {
    dir: PathBuf,
    options: ExportOptions,
}

impl Exporter {
    pub(crate) fn new(dir: PathBuf) -> Exporter {
        Exporter {
            dir,
            options: ExportOptions::default(),
        }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `snapshot` to a PDF in the export directory and returns its
    /// path.  Fails without touching the filesystem if nothing has been
    /// rendered.
    pub(crate) fn export(
        &self,
        snapshot: Option<&PrintSnapshot>,
        today: Date,
    ) -> Result<PathBuf, ExportError> {
        let snapshot = snapshot.ok_or(ExportError::NotRendered)?;
        let layout = PrintLayout::build(snapshot, &self.options);
        let bytes = pdf::render(&layout);
        fs::create_dir_all(&self.dir).map_err(|source| ExportError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(file_name(today));
        // The worker may be cut off if the app quits mid-export, so only a
        // finished document is ever renamed into place
        let part = path.with_extension("pdf.part");
        fs::write(&part, bytes)
            .and_then(|()| fs::rename(&part, &path))
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        log::info!(
            "Exported {} to {}",
            snapshot.grid.month(),
            path.display()
        );
        Ok(path)
    }

    /// Runs [`Exporter::export`] on a worker thread
    pub(crate) fn spawn(&self, snapshot: Option<PrintSnapshot>, today: Date) -> ExportJob {
        let (tx, rx) = channel();
        let exporter = self.clone();
        let r = thread::Builder::new()
            .name(String::from("pdf-export"))
            .spawn(move || {
                let outcome = exporter.export(snapshot.as_ref(), today);
                // The receiver is gone if the app quit mid-export
                let _ = tx.send(outcome);
            });
        match r {
            Ok(_) => ExportJob {
                rx: Some(rx),
                failed: None,
            },
            Err(e) => {
                log::error!("Failed to start export worker: {e}");
                ExportJob {
                    rx: None,
                    failed: Some(ExportError::Spawn(e)),
                }
            }
        }
    }
}

/// Name of the file an export on `today` is written to
pub(crate) fn file_name(today: Date) -> String {
    let ymd = today
        .format(&YMD_FMT)
        .unwrap_or_else(|_| today.to_string());
    format!("sassowitz-calendar-{ymd}.pdf")
}

/// An export running in the background
#[derive(Debug)]
pub(crate) struct ExportJob {
    rx: Option<Receiver<Result<PathBuf, ExportError>>>,
    failed: Option<ExportError>,
}

impl ExportJob {
    /// Returns the outcome once the export has finished
    pub(crate) fn poll(&mut self) -> Option<Result<PathBuf, ExportError>> {
        if let Some(e) = self.failed.take() {
            return Some(Err(e));
        }
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(outcome) => {
                self.rx = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.rx = None;
                Some(Err(ExportError::WorkerLost))
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn wait(mut self) -> Result<PathBuf, ExportError> {
        if let Some(e) = self.failed.take() {
            return Err(e);
        }
        self.rx
            .take()
            .and_then(|rx| rx.recv_timeout(std::time::Duration::from_secs(30)).ok())
            .unwrap_or(Err(ExportError::WorkerLost))
    }
}

#[derive(Debug, Error)]
pub(crate) enum ExportError {
    #[error("the calendar has not been rendered yet")]
    NotRendered,
    #[error("failed to create export directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to start export worker")]
    Spawn(#[source] std::io::Error),
    #[error("export worker exited without reporting")]
    WorkerLost,
}
