use std::fmt::{self, Write};

use layered_coref_document::{Clustering, Document, Mention};
use unicode_width::UnicodeWidthStr;

/// Convert a zero-based index to a base-26 label: A, B, ..., Z, AA, AB, ..., AZ, BA, ...
/// Similar to Excel column naming.
fn index_to_base26_label(mut n: usize) -> String {
    let mut result = String::new();
    loop {
        let remainder = n % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Renders a resolved document, one block per sentence.
///
/// ```text
/// Alice  said  she  won  .
/// ╰───╯[A] Alice
///              ╰─╯[A] she
/// ```
pub struct ClusterDisplay<'a> {
    doc: &'a Document,
    clustering: &'a Clustering,
    skip_singletons: bool,
}

impl<'a> ClusterDisplay<'a> {
    pub fn new(doc: &'a Document, clustering: &'a Clustering) -> Self {
        ClusterDisplay {
            doc,
            clustering,
            skip_singletons: false,
        }
    }

    /// Leave out mentions whose entity has no other member.
    pub fn without_singletons(mut self) -> Self {
        self.skip_singletons = true;
        self
    }

    fn label_of(&self, mention: &Mention) -> Option<String> {
        let entity = self.clustering.entity_of(mention.id())?;
        if self.skip_singletons
            && self
                .clustering
                .entities()
                .get(entity.0)
                .map_or(false, |e| e.is_singleton())
        {
            return None;
        }
        Some(format!("[{}]", index_to_base26_label(entity.0)))
    }
}

impl<'a> fmt::Display for ClusterDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SPACE_PADDING: usize = 2;

        for (sentence_idx, sentence) in self.doc.sentences().iter().enumerate() {
            if sentence_idx > 0 {
                f.write_char('\n')?;
            }

            let mut token_idx_to_start_display_char_idx = Vec::with_capacity(sentence.len());
            let mut token_idx_to_end_display_char_idx = Vec::with_capacity(sentence.len());
            let mut opening_line = String::new();
            for (i, token) in sentence.tokens().iter().enumerate() {
                if i > 0 {
                    opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
                }
                token_idx_to_start_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
                opening_line.push_str(&token.word);
                token_idx_to_end_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
            }
            f.write_str(&opening_line)?;

            for mention in self.doc.mentions().iter().filter(|m| m.sentence() == sentence_idx) {
                let label = match self.label_of(mention) {
                    Some(label) => label,
                    None => continue,
                };
                f.write_char('\n')?;

                let start_char_idx = token_idx_to_start_display_char_idx[mention.begin()];
                for _ in 0..start_char_idx {
                    f.write_char(' ')?;
                }

                f.write_char('╰')?;

                let end_char_idx = token_idx_to_end_display_char_idx[mention.end() - 1];
                let char_len = end_char_idx - start_char_idx;
                for _ in (start_char_idx + 1)..end_char_idx.saturating_sub(1) {
                    f.write_char('─')?;
                }

                if char_len > 1 {
                    f.write_char('╯')?;
                }

                write!(f, "{} {}", label, mention.gloss())?;
            }
        }

        Ok(())
    }
}
