//! `uls write`: record a file's tokens as a stream.

use std::path::{Path, PathBuf};

use uls_stream::{OutputStream, StreamError, StreamFormat};

use super::CliError;
use crate::sample_lexer;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    pub format: StreamFormat,
    /// Emit `LINENUM` packets.
    pub numbering: bool,
    /// Defaults to the input path with a `.uls` extension.
    pub output: Option<PathBuf>,
    /// Defaults to the input path.
    pub tag: Option<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            format: StreamFormat::host_binary(),
            numbering: true,
            output: None,
            tag: None,
        }
    }
}

/// Write the stream for `input`; returns the path written.
#[tracing::instrument(level = "debug", skip(options), fields(format = %options.format))]
pub fn write_stream(input: &Path, options: &WriteOptions) -> Result<PathBuf, CliError> {
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| input.with_extension("uls"));
    if output == input {
        return Err(CliError::Usage(format!(
            "output `{}` would overwrite the input",
            output.display()
        )));
    }
    let tag = options
        .tag
        .clone()
        .unwrap_or_else(|| input.display().to_string());

    let mut lexer = sample_lexer()?;
    lexer.push_file(input).map_err(StreamError::from)?;
    lexer.set_tag(&tag).map_err(StreamError::from)?;

    let mut stream = OutputStream::create_file(&output, lexer.into_shared(), options.format, &tag)?;
    stream.start_stream(options.numbering)?;
    stream.finish()?;
    Ok(output)
}
