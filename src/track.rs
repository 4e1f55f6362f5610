use crate::encoding::{self, Encoding};
use crate::error::SrtError;
use crate::parser;
use crate::processor;
use crate::serialiser;
use crate::srt::Subtitle;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Duration;
use log::{debug, info};

/// All subtitles of one SRT file, in file order.
///
/// Rows are never reordered or removed: deleting a subtitle only marks it,
/// so a row index stays valid for the lifetime of the track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub filename: PathBuf,
    pub subtitles: Vec<Subtitle>,
    encoding: Encoding,
}

impl Track {
    pub fn parse(input: &str) -> Result<Self, SrtError> {
        Ok(Track {
            filename: PathBuf::new(),
            subtitles: parser::parse_document(input)?,
            encoding: Encoding::Utf8,
        })
    }

    /// Parses raw file contents, falling back to Latin-1 when they are not
    /// valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SrtError> {
        let (text, encoding) = encoding::decode(bytes);
        let mut track = Track::parse(&text)?;
        track.encoding = encoding;
        Ok(track)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SrtError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| SrtError::io(path, e))?;
        let mut track = Track::from_bytes(&bytes)?;
        track.filename = path.to_path_buf();
        info!(
            "Loaded {} subtitles from '{}'",
            track.subtitles.len(),
            path.display()
        );
        Ok(track)
    }

    /// Replaces this track with the contents of `path`. On error the track is
    /// left as it was.
    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SrtError> {
        *self = Track::load(path)?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SrtError> {
        serialiser::serialise(&self.subtitles, path)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        serialiser::write_subs(writer, &self.subtitles)
    }

    pub fn to_srt(&self) -> String {
        self.live()
            .map(|(num, sub)| sub.to_block(num))
            .collect()
    }

    /// Live subtitles with the numbers they are written out with.
    pub fn live(&self) -> impl Iterator<Item = (usize, &Subtitle)> + '_ {
        processor::renumber(&self.subtitles)
    }

    pub fn len(&self) -> usize {
        self.subtitles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subtitles.is_empty()
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Moves every subtitle, deleted ones included, by `offset`.
    pub fn shift(&mut self, offset: Duration) {
        debug!("Shifting {} subtitles by {}ms", self.len(), offset.num_milliseconds());
        for sub in &mut self.subtitles {
            sub.start = sub.start + offset;
            sub.end = sub.end + offset;
        }
    }

    /// Finds the first row whose text contains `needle`. With `after` set,
    /// only rows strictly after it are considered. The search does not wrap.
    pub fn search(&self, needle: &str, after: Option<usize>) -> Result<usize, SrtError> {
        if needle.is_empty() {
            return Err(SrtError::NotFound(String::new()));
        }
        let first = after.map_or(0, |row| row.saturating_add(1));
        self.subtitles
            .iter()
            .enumerate()
            .skip(first)
            .find(|(_, sub)| sub.text.contains(needle))
            .map(|(row, _)| row)
            .ok_or_else(|| SrtError::NotFound(needle.to_string()))
    }

    /// Flips the delete marker of the subtitle numbered `num` in the source
    /// file. Returns the new state, or `None` if there is no such subtitle.
    pub fn toggle_delete(&mut self, num: usize) -> Option<bool> {
        let sub = self.subtitles.iter_mut().find(|s| s.num == num)?;
        let deleted = sub.toggle_deleted();
        debug!("Subtitle #{} deleted: {}", num, deleted);
        Some(deleted)
    }

    /// Reads all text as Latin-1 bytes and converts it to UTF-8. Returns
    /// `false` without touching anything if the track is already Latin-1
    /// decoded.
    pub fn convert_from_latin1(&mut self) -> bool {
        if self.encoding == Encoding::Latin1 {
            return false;
        }
        for sub in &mut self.subtitles {
            sub.text = encoding::reinterpret_as_latin1(&sub.text);
        }
        self.encoding = Encoding::Latin1;
        info!("Converted {} subtitles from Latin-1", self.len());
        true
    }
}
