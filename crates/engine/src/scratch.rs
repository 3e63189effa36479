use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Temporary file holding ACL lines for `setfacl`.
///
/// The file is removed when the value is dropped, on every exit path.
#[derive(Debug)]
pub(crate) struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Writes one line per entry of `lines` into a new scratch file.
    pub(crate) fn with_lines(directory: Option<&Path>, lines: &[String]) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("oc-facl-").suffix(".acl");
        let mut file = match directory {
            Some(directory) => builder.tempfile_in(directory)?,
            None => builder.tempfile()?,
        };
        for line in lines {
            writeln!(file, "{line}")?;
        }
        file.flush()?;
        Ok(Self { file })
    }

    pub(crate) fn path(&self) -> &Path {
        self.file.path()
    }
}
