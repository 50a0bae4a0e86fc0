//! Sources, sinks and resource ownership for streaming operations

use crate::error::{MappingError, Result};
use crate::format::RowSource;
use std::fs::{File, create_dir_all};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

/// A readable stream that can be rewound
pub trait ReadSeek: Read + Seek {}

impl<S: Read + Seek> ReadSeek for S {}

/// Where a read takes its rows from
pub enum TableSource<'a> {
    /// A named file, re-opened for every pass
    Path(PathBuf),
    /// A stream rewound to its start for every pass
    Seekable(Box<dyn ReadSeek + 'a>),
    /// A stream that can serve a single pass
    Forward(Option<Box<dyn Read + 'a>>),
}

impl<'a> TableSource<'a> {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn seekable(stream: impl Read + Seek + 'a) -> Self {
        Self::Seekable(Box::new(stream))
    }

    pub fn forward(stream: impl Read + 'a) -> Self {
        Self::Forward(Some(Box::new(stream)))
    }

    /// Identifier used in logs and errors
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Seekable(_) => "<seekable stream>".to_string(),
            Self::Forward(_) => "<stream>".to_string(),
        }
    }

    /// Open (or rewind) the source for a new pass
    pub fn open(&mut self) -> Result<Box<dyn Read + '_>> {
        let name = self.name();
        match self {
            Self::Path(path) => {
                let file = File::open(&*path).map_err(|e| MappingError::io(&name, e))?;
                Ok(Box::new(BufReader::new(file)))
            }
            Self::Seekable(stream) => {
                stream.seek(SeekFrom::Start(0)).map_err(|e| {
                    debug!("Rewind of {} failed: {}", name, e);
                    MappingError::non_seekable(&name)
                })?;
                Ok(Box::new(stream.as_mut()))
            }
            Self::Forward(stream) => match stream.take() {
                Some(stream) => Ok(stream),
                None => Err(MappingError::non_seekable(&name)),
            },
        }
    }
}

/// Where a write sends its rows
pub enum TableSink<'a> {
    /// A named file, created (or truncated) along with missing parent directories
    Path(PathBuf),
    Stream(Box<dyn Write + 'a>),
}

impl<'a> TableSink<'a> {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn stream(stream: impl Write + 'a) -> Self {
        Self::Stream(Box::new(stream))
    }

    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Stream(_) => "<stream>".to_string(),
        }
    }

    pub(crate) fn open(self) -> Result<Box<dyn Write + 'a>> {
        match self {
            Self::Path(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    create_dir_all(parent)
                        .map_err(|e| MappingError::io(parent.display().to_string(), e))?;
                }
                let file = File::create(&path)
                    .map_err(|e| MappingError::io(path.display().to_string(), e))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            Self::Stream(stream) => Ok(stream),
        }
    }
}

/// Exclusive owner of an opened row source.
///
/// The source is closed exactly once: by [`release`](Self::release) or, failing
/// that, when the guard is dropped.
pub struct ResourceGuard<'r> {
    source: Option<Box<dyn RowSource + 'r>>,
    name: String,
}

impl<'r> ResourceGuard<'r> {
    pub fn new(source: Box<dyn RowSource + 'r>, name: impl Into<String>) -> Self {
        Self {
            source: Some(source),
            name: name.into(),
        }
    }

    /// The open source, or `None` once released
    pub fn source(&mut self) -> Option<&mut (dyn RowSource + 'r)> {
        self.source.as_deref_mut()
    }

    pub fn is_released(&self) -> bool {
        self.source.is_none()
    }

    /// Close the source; later calls do nothing
    pub fn release(&mut self) -> Result<()> {
        match self.source.take() {
            Some(mut source) => {
                debug!("Releasing {}", self.name);
                source.close()
            }
            None => Ok(()),
        }
    }
}

impl Drop for ResourceGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to close {}: {}", self.name, e);
        }
    }
}
