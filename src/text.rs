//! Splitting oversized outbound messages into postable segments.

/// The character limit Mastodon imposes on a single status.
pub const MASTODON_CHAR_LIMIT: usize = 500;

/// Bytes reserved in each window for the `"\nK/N"` position tag.
///
/// Enough for two-digit segment counts; [`chunk_message`] widens the
/// reserve when a message needs a hundred or more segments.
const TAG_RESERVE: usize = 6;

/// A bounded-length piece of an oversized outbound message.
///
/// Segments are produced in posting order by [`chunk_message`] and are
/// meant to be consumed once, each one posted as a reply to the previous.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageSegment {
    text: String,
    sequence_index: usize,
    total_segments: usize,
}

impl MessageSegment {
    /// The text to post, tag included.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// This segment's 1-based position in the sequence.
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    /// The number of segments the message was split into.
    pub fn total_segments(&self) -> usize {
        self.total_segments
    }
}

/// Splits `message` into segments of no more than `limit` bytes.
///
/// A message that fits in a single window is returned unmodified as a
/// single segment. Longer messages are walked in windows of `limit`
/// minus a tag reserve (6 bytes, widened when the message needs enough
/// segments for a wider tag), cutting each window at its last space or period
/// so segments break on something resembling a word boundary, and each
/// boundary-cut segment is tagged with a trailing `"\nK/N"` marker. A
/// window with no usable boundary is cut hard at the window size and
/// carries no tag.
///
/// Cut positions always advance by exactly the length of the emitted
/// text, so concatenating the segments (tags stripped) reconstructs the
/// message byte for byte.
///
/// Lengths are measured in bytes; a hard cut that would land inside a
/// multi-byte character backs up to the nearest character boundary.
///
/// # Panics
///
/// Panics if `limit` is not large enough to hold a tag.
pub fn chunk_message(message: &str, limit: usize) -> Vec<MessageSegment> {
    assert!(limit > TAG_RESERVE, "limit must exceed the tag reserve");

    if message.len() <= limit - TAG_RESERVE {
        return vec![MessageSegment {
            text: String::from(message),
            sequence_index: 1,
            total_segments: 1,
        }];
    }

    let reserve = tag_reserve(message.len(), limit);
    assert!(limit > reserve, "limit must exceed the tag reserve");
    let window = limit - reserve;
    let total = message.len().div_ceil(window);
    let mut segments = Vec::with_capacity(total);
    let mut cursor = 0;
    let mut index = 1;

    while cursor < message.len() {
        let remaining = &message[cursor..];

        // The final window is emitted whole; cutting it at a boundary
        // would strand a tail shorter than the advertised total. It
        // goes untagged if the tag would no longer fit.
        if remaining.len() <= window {
            let text = format!("{remaining}\n{index}/{total}");
            segments.push(MessageSegment {
                text: if text.len() > limit {
                    String::from(remaining)
                } else {
                    text
                },
                sequence_index: index,
                total_segments: total,
            });
            break;
        }

        let mut end = cursor + window;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        let slice = &message[cursor..end];

        // A boundary at offset 0 would cut a zero-length segment and
        // stall the walk, so it falls back to a hard cut.
        let cut = match slice.rfind([' ', '.']) {
            Some(0) | None => 0,
            Some(position) => position + 1,
        };

        // Short cuts can push the walk past the projected total, and a
        // tag wider than the reserve would breach the limit; such a
        // window is also cut hard.
        let text = format!("{}\n{index}/{total}", &slice[..cut]);
        if cut == 0 || text.len() > limit {
            segments.push(MessageSegment {
                text: String::from(slice),
                sequence_index: index,
                total_segments: total,
            });
            cursor = end;
        } else {
            segments.push(MessageSegment {
                text,
                sequence_index: index,
                total_segments: total,
            });
            cursor += cut;
        }

        index += 1;
    }

    segments
}

/// The reserve needed so a full-window cut plus its tag stays within
/// the limit, for however many segments the message will take.
fn tag_reserve(len: usize, limit: usize) -> usize {
    let mut reserve = TAG_RESERVE;
    while limit > reserve {
        let total = len.div_ceil(limit - reserve);
        // Worst-case tag: a newline, a slash, and two numbers as wide
        // as the total.
        let needed = 2 + 2 * digits(total);
        if needed <= reserve {
            break;
        }
        reserve = needed;
    }
    reserve
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Drops a segment's `"\nK/N"` tag, if it carries one.
    fn strip_tag(segment: &MessageSegment) -> &str {
        let tag = format!(
            "\n{}/{}",
            segment.sequence_index(),
            segment.total_segments()
        );
        segment
            .text()
            .strip_suffix(&tag)
            .unwrap_or_else(|| segment.text())
    }

    fn reassemble(segments: &[MessageSegment]) -> String {
        segments.iter().map(strip_tag).collect()
    }

    #[test]
    fn it_returns_short_messages_unmodified() {
        let message = "A fine video, all things considered.";
        let segments = chunk_message(message, MASTODON_CHAR_LIMIT);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text(), message);
        assert_eq!(segments[0].sequence_index(), 1);
        assert_eq!(segments[0].total_segments(), 1);
    }

    #[test]
    fn it_keeps_a_message_exactly_at_the_window_size_whole() {
        let message = "a".repeat(MASTODON_CHAR_LIMIT - 6);
        let segments = chunk_message(&message, MASTODON_CHAR_LIMIT);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text(), message);
    }

    #[test]
    fn it_breaks_at_the_last_space_in_a_window() {
        let word = "alpha ";
        let message = word.repeat(20); // 120 bytes
        let segments = chunk_message(&message, 56); // window of 50
        assert!(segments.len() > 1);
        for segment in &segments[..segments.len() - 1] {
            assert!(strip_tag(segment).ends_with(' '));
        }
        assert_eq!(reassemble(&segments), message);
    }

    #[test]
    fn it_breaks_at_a_period_when_no_space_follows_it() {
        let message = format!("{}.{}", "a".repeat(30), "b".repeat(40));
        let segments = chunk_message(&message, 56); // window of 50
        assert_eq!(strip_tag(&segments[0]), format!("{}.", "a".repeat(30)));
        assert_eq!(reassemble(&segments), message);
    }

    #[test]
    fn it_hard_cuts_a_window_with_no_boundary() {
        let message = "a".repeat(600);
        let segments = chunk_message(&message, 500);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text().len(), 494);
        assert!(!segments[0].text().contains('\n'));
        assert_eq!(segments[0].total_segments(), 2);
        assert_eq!(
            segments[1].text(),
            format!("{}\n2/2", "a".repeat(106))
        );
        assert_eq!(reassemble(&segments), message);
    }

    #[test]
    fn it_hard_cuts_when_the_only_boundary_starts_the_window() {
        // The space lands at offset 0 of the second window.
        let message = format!("{} {}", "a".repeat(49), "b".repeat(80));
        let segments = chunk_message(&message, 56); // window of 50
        assert_eq!(strip_tag(&segments[0]), format!("{} ", "a".repeat(49)));
        for segment in &segments[1..] {
            assert!(!strip_tag(segment).contains(' '));
        }
        assert_eq!(reassemble(&segments), message);
    }

    #[test]
    fn it_never_exceeds_the_limit() {
        let limit = 56;
        let message = "the quick brown fox. jumped over the lazy dog. ".repeat(12);
        let segments = chunk_message(&message, limit);
        for segment in &segments {
            assert!(
                segment.text().len() <= limit,
                "segment of {} bytes exceeds limit {limit}",
                segment.text().len()
            );
        }
        assert_eq!(reassemble(&segments), message);
    }

    #[test]
    fn it_reconstructs_messages_with_no_boundaries_at_all() {
        let message = "x".repeat(1000);
        let segments = chunk_message(&message, 106); // window of 100
        assert_eq!(segments.len(), 10);
        for segment in &segments[..segments.len() - 1] {
            assert_eq!(segment.text().len(), 100);
        }
        assert_eq!(reassemble(&segments), message);
    }

    #[test]
    fn it_respects_character_boundaries_on_hard_cuts() {
        let message = "é".repeat(300); // 600 bytes, no spaces or periods
        let segments = chunk_message(&message, 500);
        assert_eq!(reassemble(&segments), message);
        for segment in &segments {
            assert!(segment.text().len() <= 500);
        }
    }

    #[test]
    fn it_numbers_segments_sequentially() {
        let message = "word ".repeat(100); // 500 bytes
        let segments = chunk_message(&message, 106); // window of 100
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.sequence_index(), i + 1);
        }
        let total = segments[0].total_segments();
        assert!(segments.iter().all(|s| s.total_segments() == total));
    }

    #[test]
    fn it_widens_the_tag_reserve_for_very_long_messages() {
        // Over a hundred segments gives three-digit tags; a cut at the
        // full window end must still leave room for them.
        let limit = 18;
        let message = "ab cd ef gh ij kl ".repeat(80); // 1440 bytes
        let segments = chunk_message(&message, limit);
        assert!(segments.len() >= 100);
        for segment in &segments {
            assert!(
                segment.text().len() <= limit,
                "segment of {} bytes exceeds limit {limit}",
                segment.text().len()
            );
        }
        assert_eq!(reassemble(&segments), message);
    }

    #[test]
    #[should_panic(expected = "limit must exceed the tag reserve")]
    fn it_rejects_a_limit_smaller_than_the_tag_reserve() {
        let _ = chunk_message("hello", 6);
    }
}
