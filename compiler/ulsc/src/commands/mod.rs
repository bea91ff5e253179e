//! Command handlers for the `uls` CLI.
//!
//! Each handler takes parsed options and the sink to print to, and
//! returns a [`CliError`] instead of exiting so the binary decides how to
//! report it.

mod header;
mod lex;
mod read;
mod write;

use std::path::PathBuf;

use thiserror::Error;
use uls_lexer::{ConfigError, EscapeMap};
use uls_stream::{StreamError, StreamFormat};

pub use header::show_header;
pub use lex::lex_file;
pub use read::{read_stream, ReadOptions};
pub use write::{write_stream, WriteOptions};

/// Failure of a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("invalid token specification: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Parse the options shared by `write` and `read`.
///
/// Unknown options are usage errors; the first non-option argument is
/// the input path.
pub fn parse_options(
    args: &[String],
    write: &mut WriteOptions,
    read: &mut ReadOptions,
) -> Result<PathBuf, CliError> {
    let mut input = None;
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "-o" {
            let path = args
                .get(i + 1)
                .ok_or_else(|| CliError::Usage("`-o` needs a path".to_owned()))?;
            write.output = Some(PathBuf::from(path));
            i += 2;
            continue;
        }
        if let Some(format) = arg.strip_prefix("--format=") {
            write.format = format.parse::<StreamFormat>()?;
        } else if let Some(tag) = arg.strip_prefix("--tag=") {
            write.tag = Some(tag.to_owned());
        } else if arg == "--no-lines" {
            write.numbering = false;
        } else if let Some(binding) = arg.strip_prefix("--template=") {
            let (name, value) = binding.split_once('=').ok_or_else(|| {
                CliError::Usage(format!("`--template={binding}` is not NAME=VALUE"))
            })?;
            read.templates.push((name.to_owned(), template_value(value)?));
        } else if arg == "--replay" {
            read.replay = true;
        } else if arg.starts_with('-') {
            return Err(CliError::Usage(format!("unknown option `{arg}`")));
        } else if input.is_none() {
            input = Some(PathBuf::from(arg));
        } else {
            return Err(CliError::Usage(format!("unexpected argument `{arg}`")));
        }
        i += 1;
    }
    input.ok_or_else(|| CliError::Usage("missing input file".to_owned()))
}

/// Decode C-style escapes (`\t`, `\x41` ...) in a template value.
fn template_value(value: &str) -> Result<String, CliError> {
    let bad = |reason: String| CliError::Usage(format!("bad template value `{value}`: {reason}"));
    let bytes = EscapeMap::legacy_full()
        .unescape(value.as_bytes())
        .map_err(|e| bad(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| bad("not UTF-8".to_owned()))
}
