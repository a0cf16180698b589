//! Fixed-size overlapping text chunker
//!
//! Consecutive chunks share `overlap` characters so a sentence spanning a
//! chunk boundary is present in full in at least one chunk.

/// Split `text` into chunks of at most `size` characters with `overlap`
/// characters shared between consecutive chunks
///
/// Offsets are in characters, never bytes, so multi-byte Spanish text is
/// split safely. An overlap at or above `size` is clamped so the window
/// always advances.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() || size == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let step = size - overlap.min(size - 1);

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());

        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunk_text("la ley protege la obra", 1000, 200);
        assert_eq!(chunks, vec!["la ley protege la obra".to_string()]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 1000, 200).is_empty());
    }

    #[test]
    fn consecutive_chunks_share_the_overlap() {
        let text = "abcdefghij";
        let chunks = chunk_text(text, 4, 2);
        assert_eq!(chunks, vec!["abcd", "cdef", "efgh", "ghij"]);
    }

    #[test]
    fn boundary_sentence_is_whole_in_some_chunk() {
        // 30-char windows with 10 overlap over a text whose middle sentence
        // straddles the first boundary
        let text = "primera frase de relleno aquí. La Ley 24/2015 exige algo. cierre final de texto";
        let chunks = chunk_text(text, 40, 20);
        assert!(
            chunks.iter().any(|c| c.contains("La Ley 24/2015 exige algo.")),
            "sentence crossing a boundary must survive intact: {chunks:?}"
        );
    }

    #[test]
    fn multibyte_characters_split_safely() {
        let text = "ñáéíóú".repeat(10);
        let chunks = chunk_text(&text, 7, 3);
        // Round trip through chars without panicking on byte boundaries
        assert!(chunks.iter().all(|c| c.chars().count() <= 7));
        assert!(!chunks.is_empty());
    }

    #[test]
    fn overlap_at_or_above_size_still_advances() {
        let chunks = chunk_text("abcdefgh", 3, 5);
        assert!(chunks.len() >= 2);
        assert_eq!(chunks.last().map(|c| c.ends_with('h')), Some(true));
    }
}
