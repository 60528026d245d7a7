//! Line-oriented file helpers shared by the corpus passes.

use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind},
    path::Path,
};

use crate::errors::{PhrasemillError, Result};

/// Open a buffered reader over a text file.
///
/// A missing path is reported as [`PhrasemillError::NotFound`] rather than
/// a bare I/O error.
pub(crate) fn open_reader(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(PhrasemillError::NotFound {
            path: path.display().to_string(),
        }),
        Err(err) => Err(err.into()),
    }
}

/// Create a buffered writer over a text file.
pub(crate) fn create_writer(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

/// Build a [`PhrasemillError::Parse`] for a line of `path`.
pub(crate) fn parse_error(
    path: &Path,
    line: usize,
    message: impl Into<String>,
) -> PhrasemillError {
    PhrasemillError::Parse {
        path: path.display().to_string(),
        line,
        message: message.into(),
    }
}
