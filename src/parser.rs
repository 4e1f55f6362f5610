use crate::error::SrtError;
use crate::srt::Subtitle;
use crate::timestamp::Timestamp;

use log::debug;
use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::complete::{char, digit1, one_of, space0};
use nom::combinator::{all_consuming, map_res, opt};
use nom::error::{convert_error, VerboseError};
use nom::sequence::delimited;
use nom::{Err, IResult};

type ParseResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Widest hour field we accept. Keeps the millisecond total within `i64`.
const HOURS_MAX_DIGITS: usize = 10;

const BOM: char = '\u{FEFF}';

/// Splits a whole SRT document into blocks and decodes each of them, in file
/// order. The first block that fails to decode aborts the parse.
pub fn parse_document(input: &str) -> Result<Vec<Subtitle>, SrtError> {
    let input = input.strip_prefix(BOM).unwrap_or(input);

    let mut subs = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    for line in input.lines() {
        if !line.trim().is_empty() {
            pending.push(line);
            continue;
        }
        if !pending.is_empty() {
            subs.push(decode_pending(&pending, subs.len() + 1)?);
            pending.clear();
        }
    }
    // The last block does not need a trailing blank line.
    if !pending.is_empty() {
        subs.push(decode_pending(&pending, subs.len() + 1)?);
    }

    debug!("Parsed {} subtitle blocks", subs.len());
    Ok(subs)
}

fn decode_pending(lines: &[&str], position: usize) -> Result<Subtitle, SrtError> {
    parse_block(lines).map_err(|err| SrtError::Block {
        position,
        raw: lines.join("\n"),
        source: Box::new(err),
    })
}

/// Decodes a single, already isolated block: a sequence number line, a
/// timing line and zero or more text lines.
pub fn parse_block<S: AsRef<str>>(lines: &[S]) -> Result<Subtitle, SrtError> {
    let mut lines = lines.iter().map(|line| line.as_ref());

    let num = parse_seq_num(lines.next().unwrap_or_default())?;

    let timing = lines.next().ok_or_else(|| SrtError::TimeRange {
        line: String::new(),
        reason: "missing timing line".to_string(),
    })?;
    let (start, end) = parse_time_range(timing)?;

    let text = lines.map(str::trim).collect::<Vec<_>>().join("\n");

    Ok(Subtitle {
        num,
        start,
        end,
        text: text.trim().to_string(),
        deleted: false,
    })
}

pub fn parse_seq_num(line: &str) -> Result<usize, SrtError> {
    let line = line.trim();
    match all_consuming(seq_num)(line) {
        Ok((_, num)) => Ok(num),
        Err(_) => Err(SrtError::Sequence(line.to_string())),
    }
}

pub fn parse_time_range(line: &str) -> Result<(Timestamp, Timestamp), SrtError> {
    let line = line.trim();
    if !line.contains("-->") {
        return Err(SrtError::TimeRange {
            line: line.to_string(),
            reason: "missing '-->' separator".to_string(),
        });
    }
    match all_consuming(time_range)(line) {
        Ok((_, range)) => Ok(range),
        Err(Err::Error(err)) | Err(Err::Failure(err)) => Err(SrtError::TimeRange {
            line: line.to_string(),
            reason: convert_error(line, err),
        }),
        Err(Err::Incomplete(_)) => {
            unreachable!("Incomplete data received by non-streaming parser.")
        }
    }
}

pub fn parse_timestamp(text: &str) -> Result<Timestamp, SrtError> {
    match all_consuming(timestamp)(text) {
        Ok((_, ts)) => Ok(ts),
        Err(Err::Error(err)) | Err(Err::Failure(err)) => Err(SrtError::Format {
            text: text.to_string(),
            detail: convert_error(text, err),
        }),
        Err(Err::Incomplete(_)) => {
            unreachable!("Incomplete data received by non-streaming parser.")
        }
    }
}

fn time_range(input: &str) -> ParseResult<(Timestamp, Timestamp)> {
    let (input, start) = timestamp(input)?;
    let (input, _) = delimited(space0, tag("-->"), space0)(input)?;
    let (input, end) = timestamp(input)?;
    let (input, _) = space0(input)?;

    Ok((input, (start, end)))
}

fn digits<'a>(min: usize, max: usize) -> impl FnMut(&'a str) -> ParseResult<'a, i64> {
    map_res(
        take_while_m_n(min, max, |c: char| c.is_ascii_digit()),
        |s: &str| s.parse::<i64>(),
    )
}

fn timestamp(input: &str) -> ParseResult<Timestamp> {
    let (input, negative) = opt(char('-'))(input)?;
    let (input, hours) = digits(2, HOURS_MAX_DIGITS)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, minutes) = digits(2, 2)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, seconds) = digits(2, 2)(input)?;
    // Some files carry a period instead of the SRT comma.
    let (input, _) = one_of(",.")(input)?;
    let (input, millis) = digits(3, 3)(input)?;

    let ts = Timestamp::from_hms_milli(hours, minutes, seconds, millis);
    let ts = if negative.is_some() {
        Timestamp::from_millis(-ts.as_millis())
    } else {
        ts
    };
    Ok((input, ts))
}

fn seq_num(input: &str) -> ParseResult<usize> {
    map_res(digit1, |s: &str| s.parse())(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_parse_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let ts = parse_timestamp(input).unwrap();

                assert_eq!(ts.as_millis(), expected);
            }
        )*
        }
    }

    test_parse_ts! {
        test_parse_ts_0: ("00:00:01,200", 1200),
        test_parse_ts_1: ("00:00:01,002", 1002),
        test_parse_ts_2: ("01:01:01,200", 3_661_200),
        test_parse_ts_3: ("00:00:01.200", 1200),
        test_parse_ts_4: ("100:00:00,001", 360_000_001),
        test_parse_ts_5: ("99:99:99,999", 362_439_999),
        test_parse_ts_6: ("-00:00:01,500", -1500),
    }

    macro_rules! test_reject_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let err = parse_timestamp($value).unwrap_err();

                assert!(matches!(err, SrtError::Format { .. }), "{:?}", err);
            }
        )*
        }
    }

    test_reject_ts! {
        test_reject_ts_0: "",
        test_reject_ts_1: "00:00:01",
        test_reject_ts_2: "1:1:1,200",
        test_reject_ts_3: "00:00:01,2",
        test_reject_ts_4: "00:00:01,0001",
        test_reject_ts_5: "aa:00:01,000",
        test_reject_ts_6: "00:00:01;000",
        test_reject_ts_7: "00:00:00:01,000",
    }

    #[test]
    fn time_range_accepts_loose_spacing() {
        let (start, end) = parse_time_range("00:00:01,000-->00:00:02,000 \r").unwrap();

        assert_eq!(start.as_millis(), 1000);
        assert_eq!(end.as_millis(), 2000);
    }

    #[test]
    fn time_range_keeps_reversed_order() {
        let (start, end) = parse_time_range("00:00:05,000 --> 00:00:02,000").unwrap();

        assert!(start > end);
    }

    #[test]
    fn time_range_without_separator() {
        let err = parse_time_range("00:00:01,000 00:00:02,000").unwrap_err();

        match err {
            SrtError::TimeRange { reason, .. } => assert!(reason.contains("-->")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn time_range_with_bad_side() {
        let err = parse_time_range("00:00:01,000 --> 00:0x:02,000").unwrap_err();

        assert!(matches!(err, SrtError::TimeRange { .. }));
    }

    #[test]
    fn seq_num_rejects_text() {
        assert!(matches!(parse_seq_num("abc"), Err(SrtError::Sequence(_))));
        assert!(matches!(parse_seq_num(""), Err(SrtError::Sequence(_))));
        assert_eq!(parse_seq_num(" 42\r").unwrap(), 42);
    }

    #[test]
    fn block_with_multiline_text() {
        let sub = parse_block(&[
            "7",
            "00:00:01,000 --> 00:00:02,000",
            "line one ",
            "  line two",
        ])
        .unwrap();

        assert_eq!(sub.num, 7);
        assert_eq!(sub.text, "line one\nline two");
        assert!(!sub.deleted);
    }

    #[test]
    fn block_without_text() {
        let sub = parse_block(&["1", "00:00:01,000 --> 00:00:02,000"]).unwrap();

        assert_eq!(sub.text, "");
    }

    #[test]
    fn block_without_timing_line() {
        let err = parse_block(&["1"]).unwrap_err();

        assert!(matches!(err, SrtError::TimeRange { .. }));
    }

    #[test]
    fn document_without_trailing_blank_line() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nfirst\n\n\n2\n00:00:03,000 --> 00:00:04,000\nsecond";

        let subs = parse_document(input).unwrap();

        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].text, "second");
    }

    #[test]
    fn document_with_bom_and_crlf() {
        let input = "\u{FEFF}1\r\n00:00:01,000 --> 00:00:02,000\r\nfirst\r\nsecond\r\n\r\n";

        let subs = parse_document(input).unwrap();

        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].num, 1);
        assert_eq!(subs[0].text, "first\nsecond");
    }

    #[test]
    fn document_error_names_block() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nok\n\nabc\n00:00:03,000 --> 00:00:04,000\nbad\n";

        let err = parse_document(input).unwrap_err();

        match err {
            SrtError::Block {
                position,
                raw,
                source,
            } => {
                assert_eq!(position, 2);
                assert!(raw.starts_with("abc\n"));
                assert!(matches!(*source, SrtError::Sequence(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn empty_document() {
        assert!(parse_document("").unwrap().is_empty());
        assert!(parse_document("\n \n").unwrap().is_empty());
    }
}
