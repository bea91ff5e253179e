//! `uls header`: show a stream file's header.

use std::path::Path;

use uls_stream::{InputStream, OutputSink, StreamFormat};

use super::CliError;

pub fn show_header(path: &Path, sink: &OutputSink) -> Result<(), CliError> {
    let stream = InputStream::open_file(path)?;
    let header = stream.header();
    if header.format == StreamFormat::Raw {
        sink.write_str(&format!("{}: raw source text\n", path.display()))?;
        return Ok(());
    }
    let text = format!(
        "version:  {}\nspec:     {}\nformat:   {}\ncreated:  {}\ntag:      {}\n",
        header.version, header.spec_name, header.format, header.creation_time, header.tag
    );
    sink.write_str(&text)?;
    Ok(())
}
