use crate::error::SrtError;
use crate::parser;
use crate::timestamp::Timestamp;

/// One timed entry of a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtitle {
    /// Sequence number as read from the file. Never rewritten in memory.
    pub num: usize,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Body text; lines are separated by `\n`.
    pub text: String,
    /// Soft-delete marker. Deleted subtitles stay in the track but are
    /// skipped when it is written out.
    pub deleted: bool,
}

impl Subtitle {
    pub fn new(num: usize, start: Timestamp, end: Timestamp, text: impl Into<String>) -> Self {
        Self {
            num,
            start,
            end,
            text: text.into(),
            deleted: false,
        }
    }

    /// Decodes one block of an SRT file. The block must already be isolated
    /// from its neighbours; blank lines inside it are treated as text.
    pub fn parse(block: &str) -> Result<Self, SrtError> {
        let lines: Vec<&str> = block.lines().collect();
        parser::parse_block(&lines)
    }

    /// Encodes this subtitle under the given sequence number, including the
    /// blank line that terminates the block.
    pub fn to_block(&self, num: usize) -> String {
        format!("{}\n{} --> {}\n{}\n\n", num, self.start, self.end, self.text)
    }

    pub fn toggle_deleted(&mut self) -> bool {
        self.deleted = !self.deleted;
        self.deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_then_encode() {
        let sub = Subtitle::parse("3\n00:00:01,000 --> 00:00:02,500\nline one\nline two\n").unwrap();

        assert_eq!(sub.num, 3);
        assert_eq!(sub.text, "line one\nline two");
        assert_eq!(
            sub.to_block(1),
            "1\n00:00:01,000 --> 00:00:02,500\nline one\nline two\n\n"
        );
    }

    #[test]
    fn encode_empty_text() {
        let sub = Subtitle::new(1, Timestamp::from_millis(0), Timestamp::from_millis(1), "");

        assert_eq!(sub.to_block(4), "4\n00:00:00,000 --> 00:00:00,001\n\n\n");
    }

    #[test]
    fn parse_rejects_bad_number() {
        let err = Subtitle::parse("abc\n00:00:01,000 --> 00:00:02,000\ntext").unwrap_err();

        assert!(matches!(err, SrtError::Sequence(_)));
    }

    #[test]
    fn toggle_flips_flag() {
        let mut sub = Subtitle::new(1, Timestamp::from_millis(0), Timestamp::from_millis(1), "a");

        assert!(sub.toggle_deleted());
        assert!(!sub.toggle_deleted());
    }
}
