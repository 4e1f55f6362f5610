use crate::error::SrtError;
use crate::processor;
use crate::srt::Subtitle;

use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

/// Writes the live subtitles to `output`, replacing any existing file.
pub fn serialise<P: AsRef<Path>>(subs: &[Subtitle], output: P) -> Result<(), SrtError> {
    let path = output.as_ref();
    let file = std::fs::File::create(path).map_err(|e| SrtError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_subs(&mut writer, subs).map_err(|e| SrtError::io(path, e))?;
    writer.flush().map_err(|e| SrtError::io(path, e))?;
    let deleted = processor::count_deleted(subs);
    info!(
        "Wrote {} subtitles to '{}' ({} deleted)",
        subs.len() - deleted,
        path.display(),
        deleted
    );
    Ok(())
}

pub fn write_subs<W: Write>(buf: &mut W, subs: &[Subtitle]) -> io::Result<()> {
    for (num, sub) in processor::renumber(subs) {
        write_sub(buf, num, sub)?;
    }
    Ok(())
}

pub fn write_sub<W: Write>(buf: &mut W, num: usize, sub: &Subtitle) -> io::Result<()> {
    buf.write_all(sub.to_block(num).as_bytes())
}
