use serde::{Deserialize, Serialize};

/// How a text is cut into reorderable pieces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Sentence,
    Word,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Sentence => "sentence",
            Granularity::Word => "word",
        }
    }

    /// Word games compare units loosely (case and terminal punctuation).
    pub fn normalizes(self) -> bool {
        matches!(self, Granularity::Word)
    }
}

pub fn tokenize(text: &str, granularity: Granularity) -> Vec<String> {
    match granularity {
        Granularity::Sentence => split_sentences(text),
        Granularity::Word => split_words(text),
    }
}

fn is_terminal(ch: char) -> bool {
    matches!(ch, '.' | '?' | '!')
}

/// Cuts at every whitespace run that directly follows `.`, `?` or `!`.
/// The separating whitespace belongs to neither sentence.
fn split_sentences(text: &str) -> Vec<String> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch.is_whitespace() && prev.is_some_and(is_terminal) {
            let mut end_of_run = idx + ch.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end_of_run = next_idx + next.len_utf8();
                chars.next();
            }
            push_nonempty(&mut sentences, &text[start..idx]);
            start = end_of_run;
            prev = None;
            continue;
        }
        prev = Some(ch);
    }
    push_nonempty(&mut sentences, &text[start..]);
    sentences
}

/// Each word keeps the whitespace that follows it, so concatenating the
/// units gives back the text (minus any leading whitespace).
fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_gap = false;

    for ch in text.trim_start().chars() {
        if ch.is_whitespace() {
            in_gap = true;
        } else if in_gap {
            words.push(std::mem::take(&mut current));
            in_gap = false;
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn push_nonempty(out: &mut Vec<String>, piece: &str) {
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}
