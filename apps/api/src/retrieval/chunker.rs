//! Sentence-aware text chunking for index builds.

/// A chunk of a source document.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub index: usize,
}

/// Splits documents into chunks of roughly `chunk_size` characters, never
/// cutting inside a sentence unless a single sentence is longer than the
/// budget. Consecutive chunks share trailing sentences worth about
/// `overlap_ratio * chunk_size` characters.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap_size: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, overlap_ratio: f32) -> Self {
        let chunk_size = chunk_size.max(1);
        let overlap_ratio = overlap_ratio.clamp(0.0, 0.5);
        Self {
            chunk_size,
            overlap_size: (chunk_size as f32 * overlap_ratio) as usize,
        }
    }

    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if text.chars().count() <= self.chunk_size {
            return vec![Chunk {
                text: text.to_string(),
                index: 0,
            }];
        }

        let sentences: Vec<String> = split_sentences(text)
            .into_iter()
            .flat_map(|s| self.hard_split(s))
            .collect();

        let mut chunks: Vec<Chunk> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0usize;

        for sentence in &sentences {
            let len = sentence.chars().count();
            if !current.is_empty() && current_len + len + 1 > self.chunk_size {
                chunks.push(Chunk {
                    text: current.join(" "),
                    index: chunks.len(),
                });
                let carried = self.overlap_tail(&current);
                current = carried;
                current_len = joined_len(&current);
                // Overlap must never prevent progress.
                if current_len + len + 1 > self.chunk_size {
                    current.clear();
                    current_len = 0;
                }
            }
            if !current.is_empty() {
                current_len += 1;
            }
            current.push(sentence.as_str());
            current_len += len;
        }

        if !current.is_empty() {
            chunks.push(Chunk {
                text: current.join(" "),
                index: chunks.len(),
            });
        }
        chunks
    }

    /// Trailing sentences of `sentences` that fit in the overlap budget.
    fn overlap_tail<'a>(&self, sentences: &[&'a str]) -> Vec<&'a str> {
        let mut tail = Vec::new();
        let mut len = 0usize;
        for s in sentences.iter().rev() {
            let n = s.chars().count();
            if len + n > self.overlap_size {
                break;
            }
            len += n + 1;
            tail.push(*s);
        }
        tail.reverse();
        tail
    }

    fn hard_split(&self, sentence: &str) -> Vec<String> {
        let chars: Vec<char> = sentence.chars().collect();
        if chars.len() <= self.chunk_size {
            return vec![sentence.to_string()];
        }
        chars
            .chunks(self.chunk_size)
            .map(|c| c.iter().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn joined_len(parts: &[&str]) -> usize {
    let chars: usize = parts.iter().map(|s| s.chars().count()).sum();
    chars + parts.len().saturating_sub(1)
}

/// Splits on `.`, `!`, `?` followed by whitespace or end of text. Blank lines
/// also end a sentence so headings do not glue onto paragraphs.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        let next = iter.peek().map(|(_, n)| *n);
        let boundary = match c {
            '.' | '!' | '?' => next.map_or(true, char::is_whitespace),
            '\n' => next == Some('\n'),
            _ => false,
        };
        if boundary {
            let end = i + c.len_utf8();
            let piece = text[start..end].trim();
            if !piece.is_empty() {
                sentences.push(piece);
            }
            start = end;
        }
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}
