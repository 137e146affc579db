// SRT subtitle format
use super::SubtitleEntry;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

fn block_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("Invalid regex"))
}

fn timestamp_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})$").expect("Invalid regex"))
}

/// Parse SRT text into entries, in file order.
///
/// Blocks with fewer than three lines are skipped, and a timestamp that does
/// not match `HH:MM:SS,mmm` reads as zero. Nothing here fails.
pub fn parse(raw: &str) -> Vec<SubtitleEntry> {
    let normalized = raw.trim_start_matches('\u{feff}').replace("\r\n", "\n");

    block_separator()
        .split(normalized.trim())
        .filter_map(parse_block)
        .collect()
}

fn parse_block(block: &str) -> Option<SubtitleEntry> {
    let lines: Vec<&str> = block.split('\n').collect();
    if lines.len() < 3 {
        return None;
    }

    let (start_ms, end_ms) = parse_time_range(lines[1].trim());

    Some(SubtitleEntry {
        index: lines[0].trim().to_string(),
        start_ms,
        end_ms,
        text: lines[2..].join("\n").trim().to_string(),
    })
}

fn parse_time_range(line: &str) -> (u64, u64) {
    let (start, end) = line.split_once(" --> ").unwrap_or((line, ""));
    (parse_timestamp(start.trim()), parse_timestamp(end.trim()))
}

/// `HH:MM:SS,mmm` to milliseconds; anything else is 0.
pub fn parse_timestamp(ts: &str) -> u64 {
    let Some(caps) = timestamp_pattern().captures(ts) else {
        return 0;
    };

    let field = |i: usize| caps[i].parse::<u64>().unwrap_or(0);
    let (hours, minutes, seconds, millis) = (field(1), field(2), field(3), field(4));

    (hours * 3600 + minutes * 60 + seconds) * 1000 + millis
}

pub fn format_timestamp(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = d.subsec_millis();
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(Duration::from_millis(1500)),
            "00:00:01,500"
        );
        assert_eq!(
            format_timestamp(Duration::from_secs(3661) + Duration::from_millis(123)),
            "01:01:01,123"
        );
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:00:01,500"), 1500);
        assert_eq!(parse_timestamp("01:01:01,123"), 3_661_123);
        assert_eq!(parse_timestamp("00:00:01.500"), 0);
        assert_eq!(parse_timestamp("0:00:01,500"), 0);
        assert_eq!(parse_timestamp(""), 0);
    }

    #[test]
    fn test_parse_two_entries() {
        let entries =
            parse("1\n00:00:01,000 --> 00:00:02,500\nhello\n\n2\n00:00:03,000 --> 00:00:04,000\nworld");

        assert_eq!(entries.len(), 2);
        assert_eq!((entries[0].start_ms, entries[0].end_ms), (1000, 2500));
        assert_eq!((entries[1].start_ms, entries[1].end_ms), (3000, 4000));
        assert_eq!(entries[0].text, "hello");
        assert_eq!(entries[1].text, "world");
        assert_eq!(entries[1].index, "2");
    }

    #[test]
    fn test_two_line_block_dropped() {
        assert!(parse("1\n00:00:00,000 --> 00:00:01,000").is_empty());
    }

    #[test]
    fn test_malformed_timestamp_reads_as_zero() {
        let entries = parse("1\nbad-timestamp\ntext");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].start_ms, 0);
        assert_eq!(entries[0].end_ms, 0);
        assert_eq!(entries[0].text, "text");
    }

    #[test]
    fn test_one_side_malformed() {
        let entries = parse("1\n00:00:05,000 --> soon\ntext");
        assert_eq!(entries[0].start_ms, 5000);
        assert_eq!(entries[0].end_ms, 0);
    }

    #[test]
    fn test_multiline_text_and_loose_separators() {
        let raw = "\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nline one\r\nline two\r\n \r\n\r\n\
                   A7\n00:00:03,000 --> 00:00:04,000  \nthird\n\n\n";
        let entries = parse(raw);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "line one\nline two");
        assert_eq!(entries[1].index, "A7");
        assert_eq!(entries[1].end_ms, 4000);
    }

    #[test]
    fn test_file_order_is_kept() {
        let entries = parse(
            "2\n00:00:05,000 --> 00:00:06,000\nlater\n\n1\n00:00:01,000 --> 00:00:02,000\nearlier",
        );
        assert_eq!(entries[0].text, "later");
        assert_eq!(entries[1].text, "earlier");
    }

    #[test]
    fn test_parse_is_repeatable() {
        let raw = "1\n00:00:01,000 --> 00:00:02,000\nsame\n\n2\n00:00:02,000 --> 00:00:03,000\nagain";
        assert_eq!(parse(raw), parse(raw));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n  \n").is_empty());
    }
}
