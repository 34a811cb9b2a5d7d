use crate::volume::Volume;

use std::sync::Arc;
use thiserror::Error;

/// Failure reported by an upstream volume producer during refresh,
/// e.g. a read error bubbling up from the file-reading subsystem.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SourceError(String);

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// An upstream producer that must be asked to refresh before its output
/// metadata or data can be read.
///
/// `refresh` blocks on the calling thread and may trigger upstream
/// computation (re-reading files, re-running filters). `output` returns the
/// most recent product, or `None` if production has never succeeded.
pub trait VolumeSource {
    fn refresh(&mut self) -> Result<(), SourceError>;

    fn output(&self) -> Option<Arc<Volume>>;
}

/// Current input of a reslice session.
pub enum ResliceInput {
    /// Immutable volume, shared read-only across sessions. Geometry reads
    /// are instantaneous.
    Snapshot(Arc<Volume>),
    /// Live upstream connection; reads go through [`VolumeSource::refresh`]
    /// first and block until the producer is up to date.
    Connection(Box<dyn VolumeSource>),
}

impl std::fmt::Debug for ResliceInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snapshot(volume) => f.debug_tuple("Snapshot").field(&volume.dim()).finish(),
            Self::Connection(_) => f.debug_tuple("Connection").finish(),
        }
    }
}
