/// A contiguous run of text, either matched by the query or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: false,
        }
    }

    fn matched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: true,
        }
    }
}

/// Split `text` into segments, marking every non-overlapping case-insensitive
/// occurrence of `query`. The query is a literal, never a pattern.
///
/// Concatenating the returned segments always yields `text` unchanged, with
/// the original casing of matched runs preserved. An empty query returns the
/// whole text as a single plain segment.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    let needle: Vec<char> = query.chars().collect();
    if needle.is_empty() {
        return vec![Segment::plain(text)];
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;

    while i + needle.len() <= chars.len() {
        let window = &chars[i..i + needle.len()];
        let hit = window
            .iter()
            .zip(&needle)
            .all(|(&(_, c), &q)| eq_ignore_case(c, q));
        if !hit {
            i += 1;
            continue;
        }

        let start = chars[i].0;
        let end = chars
            .get(i + needle.len())
            .map_or(text.len(), |&(offset, _)| offset);
        if plain_start < start {
            segments.push(Segment::plain(&text[plain_start..start]));
        }
        segments.push(Segment::matched(&text[start..end]));
        plain_start = end;
        i += needle.len();
    }

    if plain_start < text.len() || segments.is_empty() {
        segments.push(Segment::plain(&text[plain_start..]));
    }
    segments
}

fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn matched(segments: &[Segment]) -> Vec<&str> {
        segments
            .iter()
            .filter(|s| s.matched)
            .map(|s| s.text.as_str())
            .collect()
    }

    #[test]
    fn empty_query_returns_text_unsegmented() {
        let segments = highlight("C106Aa", "");
        assert_eq!(segments, vec![Segment::plain("C106Aa")]);
    }

    #[test]
    fn empty_text_yields_one_plain_segment() {
        assert_eq!(highlight("", "abc"), vec![Segment::plain("")]);
    }

    #[test]
    fn match_preserves_original_casing() {
        let segments = highlight("C106Aa", "c1");
        assert_eq!(
            segments,
            vec![Segment::matched("C1"), Segment::plain("06Aa")]
        );
    }

    #[test]
    fn marks_every_occurrence() {
        let segments = highlight("abcABCabc", "abc");
        assert_eq!(matched(&segments), vec!["abc", "ABC", "abc"]);
        assert_eq!(joined(&segments), "abcABCabc");
    }

    #[test]
    fn occurrences_do_not_overlap() {
        let segments = highlight("aaaa", "aa");
        assert_eq!(segments, vec![Segment::matched("aa"), Segment::matched("aa")]);

        let segments = highlight("aaa", "aa");
        assert_eq!(segments, vec![Segment::matched("aa"), Segment::plain("a")]);
    }

    #[test]
    fn regex_metacharacters_match_literally() {
        let segments = highlight("xa.b*y", "a.b*");
        assert_eq!(
            segments,
            vec![
                Segment::plain("x"),
                Segment::matched("a.b*"),
                Segment::plain("y"),
            ]
        );

        let segments = highlight("axbb", "a.b*");
        assert!(matched(&segments).is_empty());

        let segments = highlight("(()[]", "(");
        assert_eq!(matched(&segments), vec!["(", "("]);
    }

    #[test]
    fn no_match_leaves_text_plain() {
        assert_eq!(highlight("06908e", "zz"), vec![Segment::plain("06908e")]);
    }

    #[test]
    fn query_longer_than_text_is_not_a_match() {
        assert_eq!(highlight("ab", "abc"), vec![Segment::plain("ab")]);
    }

    #[test]
    fn multibyte_text_reconstructs_exactly() {
        let text = "Straße STRASSE straße";
        let segments = highlight(text, "STRAßE");
        assert_eq!(joined(&segments), text);
        assert_eq!(matched(&segments), vec!["Straße", "straße"]);

        let segments = highlight("ÄpfelÄPFEL", "äpfel");
        assert_eq!(matched(&segments), vec!["Äpfel", "ÄPFEL"]);
    }

    #[test]
    fn concatenation_reconstructs_text() {
        let cases = [
            ("0xdCD57c947C4BFe00B84fECFFd4d4956f85C23552", "c"),
            ("CFB06C", "06"),
            ("hello world", "o"),
            ("mississippi", "ss"),
            ("a.b*a.b*", "A.B*"),
        ];
        for (text, query) in cases {
            let segments = highlight(text, query);
            assert_eq!(joined(&segments), text, "query {query:?}");
            for segment in segments.iter().filter(|s| s.matched) {
                assert!(segment.text.eq_ignore_ascii_case(query));
            }
        }
    }
}
