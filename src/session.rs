use crate::srt::Subtitle;
use crate::timestamp::Timestamp;
use crate::track::Track;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Duration;
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;

const PAGE_SIZE: usize = 20;
const NEWLINE_SYMBOL: &str = "↩";

static OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-])?(\d+)(ms|s)?$").expect("offset pattern is valid"));

const SHORTCUTS: &[(&str, &str)] = &[
    ("l [ROW]", "List subtitles"),
    ("[", "Go to start"),
    ("]", "Go to end"),
    ("g ROW", "Go to row"),
    ("+ OFFSET", "Add time"),
    ("- OFFSET", "Subtract time"),
    ("/ TEXT", "Search"),
    ("n", "Search next"),
    ("d [NUM]", "Toggle delete"),
    ("e TEXT", "Edit text (\\n for a line break)"),
    ("u", "Convert to UTF-8"),
    ("w [FILE]", "Save"),
    ("x", "Save and exit"),
    ("q", "Exit"),
];

/// Parses a time offset: plain milliseconds (`1500`, `-200ms`), seconds
/// (`2s`) or a full timestamp (`-00:00:01,500`).
pub fn parse_offset(text: &str) -> Result<Duration> {
    let text = text.trim();
    if let Some(caps) = OFFSET.captures(text) {
        let amount: i64 = caps[2]
            .parse()
            .with_context(|| format!("Offset out of range: '{}'", text))?;
        let millis = match caps.get(3).map(|m| m.as_str()) {
            Some("s") => amount
                .checked_mul(1000)
                .ok_or_else(|| anyhow!("Offset out of range: '{}'", text))?,
            _ => amount,
        };
        let millis = if caps.get(1).map(|m| m.as_str()) == Some("-") {
            -millis
        } else {
            millis
        };
        return Ok(Duration::milliseconds(millis));
    }
    let unsigned = text.strip_prefix('+').unwrap_or(text);
    let ts = Timestamp::from_str(unsigned)
        .with_context(|| format!("Invalid time offset: '{}'", text))?;
    Ok(Duration::milliseconds(ts.as_millis()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(Option<usize>),
    First,
    Last,
    Goto(usize),
    Shift(Duration),
    Search(String),
    SearchNext,
    ToggleDelete(Option<usize>),
    Edit(String),
    ConvertLatin1,
    Save(Option<PathBuf>),
    SaveAndExit,
    Quit,
    Help,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (name, arg) = match line.chars().next() {
            Some(c @ ('/' | '+' | '-' | '[' | ']')) => line.split_at(c.len_utf8()),
            _ => line.split_once(char::is_whitespace).unwrap_or((line, "")),
        };
        let arg = arg.trim();
        let optional_num = |arg: &str| -> Result<Option<usize>> {
            if arg.is_empty() {
                return Ok(None);
            }
            arg.parse()
                .map(Some)
                .with_context(|| format!("Expected a number, found '{}'", arg))
        };

        let cmd = match name {
            "l" | "list" => Command::List(optional_num(arg)?),
            "[" => Command::First,
            "]" => Command::Last,
            "g" | "goto" => Command::Goto(
                optional_num(arg)?.ok_or_else(|| anyhow!("Missing row number"))?,
            ),
            "+" => Command::Shift(parse_offset(arg)?),
            "-" => Command::Shift(-parse_offset(arg)?),
            "/" => Command::Search(arg.to_string()),
            "n" => Command::SearchNext,
            "d" | "delete" => Command::ToggleDelete(optional_num(arg)?),
            "e" | "edit" => Command::Edit(arg.replace("\\n", "\n")),
            "u" => Command::ConvertLatin1,
            "w" | "save" => Command::Save(if arg.is_empty() {
                None
            } else {
                Some(PathBuf::from(arg))
            }),
            "x" => Command::SaveAndExit,
            "q" | "quit" => Command::Quit,
            "h" | "?" | "help" => Command::Help,
            other => bail!("Unknown command '{}', type 'h' for help", other),
        };
        Ok(cmd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// An interactive editing session over one track.
///
/// The session owns the track, the row the cursor is on and the last search
/// term, which `n` reuses.
pub struct Session {
    track: Track,
    output: PathBuf,
    cursor: usize,
    search_term: String,
}

impl Session {
    pub fn new(track: Track, output: impl Into<PathBuf>) -> Self {
        Self {
            track,
            output: output.into(),
            cursor: 0,
            search_term: String::new(),
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Reads commands line by line until `q`, `x` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "{} ({} subtitles), type 'h' for help",
            self.track.filename.display(),
            self.track.len()
        )?;
        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;
            let line = match lines.next() {
                Some(line) => line.context("Failed to read command")?,
                None => return Ok(()),
            };
            if line.trim().is_empty() {
                continue;
            }
            let flow = match line.parse::<Command>() {
                Ok(cmd) => self.execute(cmd, out)?,
                Err(err) => {
                    writeln!(out, "{:#}", err)?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    pub fn execute<W: Write>(&mut self, cmd: Command, out: &mut W) -> Result<Flow> {
        match cmd {
            Command::List(row) => {
                let first = row.map_or(self.cursor, |r| r.saturating_sub(1));
                for (i, sub) in self
                    .track
                    .subtitles
                    .iter()
                    .enumerate()
                    .skip(first)
                    .take(PAGE_SIZE)
                {
                    writeln!(out, "{}", render_row(i, sub, i == self.cursor))?;
                }
            }
            Command::First => self.move_to(0, out)?,
            Command::Last => self.move_to(self.track.len().saturating_sub(1), out)?,
            Command::Goto(row) => {
                if row == 0 || row > self.track.len() {
                    writeln!(out, "No row {}", row)?;
                } else {
                    self.move_to(row - 1, out)?;
                }
            }
            Command::Shift(offset) => {
                self.track.shift(offset);
                writeln!(
                    out,
                    "Shifted {} subtitles by {}ms",
                    self.track.len(),
                    offset.num_milliseconds()
                )?;
            }
            Command::Search(term) => {
                self.search_term = term;
                self.find(None, out)?;
            }
            Command::SearchNext => self.find(Some(self.cursor), out)?,
            Command::ToggleDelete(Some(num)) => match self.track.toggle_delete(num) {
                Some(deleted) => report_toggle(out, num, deleted)?,
                None => writeln!(out, "No subtitle #{}", num)?,
            },
            Command::ToggleDelete(None) => match self.track.subtitles.get_mut(self.cursor) {
                Some(sub) => {
                    let deleted = sub.toggle_deleted();
                    report_toggle(out, sub.num, deleted)?;
                }
                None => writeln!(out, "Nothing to delete")?,
            },
            Command::Edit(text) => match self.track.subtitles.get_mut(self.cursor) {
                Some(sub) => {
                    sub.text = text;
                    writeln!(out, "{}", render_row(self.cursor, sub, true))?;
                }
                None => writeln!(out, "Nothing to edit")?,
            },
            Command::ConvertLatin1 => {
                if self.track.convert_from_latin1() {
                    writeln!(out, "Converted text to UTF-8")?;
                } else {
                    writeln!(out, "Text is already converted")?;
                }
            }
            Command::Save(path) => {
                let path = path.unwrap_or_else(|| self.output.clone());
                self.save(path, out)?;
            }
            Command::SaveAndExit => {
                if self.save(self.output.clone(), out)? {
                    return Ok(Flow::Exit);
                }
            }
            Command::Quit => return Ok(Flow::Exit),
            Command::Help => {
                for (key, action) in SHORTCUTS {
                    writeln!(out, "{:>10}: {}", key, action)?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn current(&self) -> Option<&Subtitle> {
        self.track.subtitles.get(self.cursor)
    }

    fn move_to<W: Write>(&mut self, row: usize, out: &mut W) -> Result<()> {
        self.cursor = row;
        if let Some(sub) = self.current() {
            writeln!(out, "{}", render_row(row, sub, true))?;
        }
        Ok(())
    }

    fn find<W: Write>(&mut self, after: Option<usize>, out: &mut W) -> Result<()> {
        match self.track.search(&self.search_term, after) {
            Ok(row) => self.move_to(row, out),
            Err(err) if err.is_not_found() => {
                writeln!(out, "Not found!")?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Saves the track, reporting failures to the user. Returns whether the
    /// save succeeded.
    fn save<W: Write>(&self, path: PathBuf, out: &mut W) -> Result<bool> {
        match self.track.save(&path) {
            Ok(()) => {
                info!("Session saved to '{}'", path.display());
                writeln!(out, "Saved to {}", path.display())?;
                Ok(true)
            }
            Err(err) => {
                let err = anyhow::Error::new(err);
                error!("{:#}", err);
                writeln!(out, "Save failed: {:#}", err)?;
                Ok(false)
            }
        }
    }
}

fn report_toggle<W: Write>(out: &mut W, num: usize, deleted: bool) -> Result<()> {
    if deleted {
        writeln!(out, "Subtitle #{} deleted", num)?;
    } else {
        writeln!(out, "Subtitle #{} restored", num)?;
    }
    Ok(())
}

fn render_row(row: usize, sub: &Subtitle, selected: bool) -> String {
    format!(
        "{}{:>5} {:>5} {} {} {}{}",
        if selected { ">" } else { " " },
        row + 1,
        sub.num,
        sub.start,
        sub.end,
        if sub.deleted { "[deleted] " } else { "" },
        sub.text.replace('\n', NEWLINE_SYMBOL)
    )
}
