use std::fmt;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Context, Result};
use log::{debug, warn};

use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::timestamp::{self, TimestampPolicy};

// @module: Subtitle cue model, SRT loading and saving

// @const: Time range line, start and end token around the arrow
static TIME_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\S+?)\s*-->\s*(\S+)").expect("time range regex is valid")
});

/// Line terminator used for everything written out
pub const LINE_ENDING: &str = "\r\n";

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: On time in ms
    pub start_time_ms: u32,

    // @field: Off time in ms
    pub end_time_ms: u32,

    // @field: Cue text, every line terminated by '\n'
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(start_time_ms: u32, end_time_ms: u32, text: impl Into<String>) -> Self {
        SubtitleEntry {
            start_time_ms,
            end_time_ms,
            text: text.into(),
        }
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        timestamp::format_clock_time(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        timestamp::format_clock_time(self.end_time_ms)
    }
}

/// A cue paired with its 1-based number, rendered as one SRT block
/// without the trailing blank separator line.
pub struct NumberedEntry<'a> {
    pub number: usize,
    pub entry: &'a SubtitleEntry,
}

impl fmt::Display for NumberedEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.number, LINE_ENDING)?;
        write!(
            f,
            "{} --> {}{}",
            self.entry.format_start_time(),
            self.entry.format_end_time(),
            LINE_ENDING
        )?;
        for line in self.entry.text.lines() {
            write!(f, "{}{}", line, LINE_ENDING)?;
        }
        Ok(())
    }
}

/// Ordered collection of subtitle cues, addressed by position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleCollection {
    entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from already parsed entries
    pub fn from_entries(entries: Vec<SubtitleEntry>) -> Self {
        SubtitleCollection { entries }
    }

    /// Append a cue at the end
    pub fn push(&mut self, entry: SubtitleEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SubtitleEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [SubtitleEntry] {
        &mut self.entries
    }

    /// Cue at a 1-based position, as numbered in the file
    pub fn get_numbered(&self, number: usize) -> Result<&SubtitleEntry, SubtitleError> {
        number
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .ok_or(SubtitleError::IndexOutOfRange {
                index: number,
                count: self.entries.len(),
            })
    }

    /// Render the cue at a 0-based position as a single SRT block
    pub fn format_cue(&self, index: usize) -> Option<String> {
        self.entries.get(index).map(|entry| {
            NumberedEntry {
                number: index + 1,
                entry,
            }
            .to_string()
        })
    }

    /// Read and parse SRT content from any reader
    pub fn from_reader<R: Read>(mut reader: R, policy: TimestampPolicy) -> Result<Self, SubtitleError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                warn!("Input is not valid UTF-8, invalid bytes will be replaced");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        Self::parse_srt_string(&content, policy)
    }

    /// Read and parse an SRT file
    pub fn from_file<P: AsRef<Path>>(path: P, policy: TimestampPolicy) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open subtitle file: {}", path.display()))?;
        let collection = Self::from_reader(file, policy)
            .with_context(|| format!("Failed to load subtitle file: {}", path.display()))?;
        Ok(collection)
    }

    /// Parse SRT format string into a collection.
    ///
    /// Blocks must be numbered 1, 2, 3, ... in order; a block whose number
    /// does not follow its predecessor aborts the whole load.
    pub fn parse_srt_string(content: &str, policy: TimestampPolicy) -> Result<Self, SubtitleError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let is_blank = |line: &str| line.trim().is_empty();

        let mut collection = Self::new();
        let mut lines = content.lines().enumerate().map(|(i, line)| (i + 1, line));

        loop {
            let Some((index_line_no, index_line)) = lines.find(|(_, line)| !is_blank(*line)) else {
                break;
            };

            let expected = collection.len() + 1;
            let found = index_line.trim();
            match found.parse::<usize>() {
                Ok(number) if number == expected => {}
                _ => {
                    return Err(SubtitleError::parse(
                        index_line_no,
                        format!("expected subtitle number {}, found {:?}", expected, found),
                    ));
                }
            }

            let (time_line_no, time_line) = lines.next().ok_or_else(|| {
                SubtitleError::parse(index_line_no + 1, "unexpected end of input, expected a time range")
            })?;
            let (start_time_ms, end_time_ms) = Self::parse_time_range(time_line, policy)
                .map_err(|e| SubtitleError::parse(time_line_no, e.to_string()))?;

            let mut text = String::new();
            for (_, line) in lines.by_ref() {
                if is_blank(line) {
                    break;
                }
                text.push_str(line.trim_end_matches('\r'));
                text.push('\n');
            }

            collection.push(SubtitleEntry {
                start_time_ms,
                end_time_ms,
                text,
            });
        }

        debug!("Loaded {} subtitle entries", collection.len());
        Ok(collection)
    }

    /// Parse `<clock> --> <clock>` into start and end milliseconds
    fn parse_time_range(line: &str, policy: TimestampPolicy) -> Result<(u32, u32), SubtitleError> {
        let caps = TIME_RANGE_REGEX.captures(line).ok_or_else(|| {
            SubtitleError::Timestamp(format!("{:?}: expected '<start> --> <end>'", line.trim()))
        })?;

        let start = timestamp::parse_clock_time(&caps[1], policy)?;
        let end = timestamp::parse_clock_time(&caps[2], policy)?;
        Ok((start, end))
    }

    /// Write every cue as SRT with CRLF line endings
    pub fn write_srt<W: Write>(&self, writer: &mut W) -> Result<(), SubtitleError> {
        for (i, entry) in self.entries.iter().enumerate() {
            write!(writer, "{}{}", NumberedEntry { number: i + 1, entry }, LINE_ENDING)?;
        }
        Ok(())
    }

    /// Render the whole collection as SRT text
    pub fn to_srt_string(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{}{}", NumberedEntry { number: i + 1, entry }, LINE_ENDING))
            .collect()
    }

    /// Write subtitles to an SRT file, replacing it only once fully written
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        FileManager::write_atomic(path, self.to_srt_string().as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        if let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) {
            writeln!(f, "Span: {} - {}", first.format_start_time(), last.format_end_time())?;
        }
        Ok(())
    }
}
