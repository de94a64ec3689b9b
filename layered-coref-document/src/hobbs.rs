//! Hobbs-style syntactic antecedent search for pronouns.
//!
//! The walk starts at the pronoun's noun phrase, climbs to the nearest
//! `NP`/`S` ancestor, and searches breadth-first to the left of the path it
//! came up by. When the top of the sentence is reached, earlier sentences are
//! searched whole, most recent first.
//!
//! ```text
//! (S (NP (NP John 's) father) (VP loved (NP him)))
//!        ╰──────────╯                   ╰─╯
//!        antecedent                     pronoun
//! ```
//!
//! `John 's father` is skipped: nothing intervenes between it and `S`.
//! The steps that propose `X` itself and search right of the path are not
//! used, so an antecedent always precedes its pronoun.

use crate::{Agreement, Document, MentionId, NodeId, ParseTree};

fn is_np(tree: &ParseTree, node: NodeId) -> bool {
    tree.has_label(node, "NP")
}

fn is_np_or_s(tree: &ParseTree, node: NodeId) -> bool {
    tree.has_label(node, "NP") || tree.has_label(node, "S")
}

/// Returns true if an `NP` or `S` lies strictly between `node` and `top`.
fn has_intervening(tree: &ParseTree, node: NodeId, top: NodeId) -> bool {
    tree.ancestors(node)
        .take_while(|&a| a != top)
        .any(|a| is_np_or_s(tree, a))
}

fn is_highest_s(tree: &ParseTree, node: NodeId) -> bool {
    tree.has_label(node, "S") && !tree.ancestors(node).any(|a| tree.has_label(a, "S"))
}

/// Most likely antecedent of `pronoun`, or `pronoun` itself when none is found.
pub fn find_antecedent(doc: &Document, pronoun: MentionId, agreement: &Agreement) -> MentionId {
    search(doc, pronoun, agreement).unwrap_or(pronoun)
}

fn search(doc: &Document, pronoun: MentionId, agreement: &Agreement) -> Option<MentionId> {
    let mention = doc.mention(pronoun);
    let sentence = mention.sentence();
    let tree = doc.tree_of(pronoun);

    let accept = |sentence: usize, node: NodeId| -> Option<MentionId> {
        let candidate = doc.mention_at(sentence, node)?;
        let ok = candidate != pronoun && agreement.passes(doc, pronoun, candidate);
        log::trace!(
            "hobbs: `{}` proposes `{}` ({})",
            mention.gloss(),
            doc.mention(candidate).gloss(),
            if ok { "accepted" } else { "rejected" }
        );
        ok.then(|| candidate)
    };

    let np = std::iter::once(mention.node())
        .chain(tree.ancestors(mention.node()))
        .find(|&n| is_np(tree, n))?;
    let mut x = tree.ancestors(np).find(|&n| is_np_or_s(tree, n))?;
    let mut path = tree.path(x, np)?;

    let found = tree
        .breadth_first(x, Some(&path))
        .into_iter()
        .filter(|&n| is_np(tree, n) && has_intervening(tree, n, x))
        .find_map(|n| accept(sentence, n));
    if found.is_some() {
        return found;
    }

    loop {
        let next = tree.ancestors(x).find(|&n| is_np_or_s(tree, n));
        let next = match next {
            Some(n) if !is_highest_s(tree, x) => n,
            _ => break,
        };

        let mut extended = tree.path(next, x)?;
        extended.extend(path.into_iter().skip(1));
        path = extended;
        x = next;

        let found = tree
            .breadth_first(x, Some(&path))
            .into_iter()
            .filter(|&n| is_np(tree, n))
            .find_map(|n| accept(sentence, n));
        if found.is_some() {
            return found;
        }
    }

    (0..sentence).rev().find_map(|previous| {
        let tree = doc.sentences()[previous].tree();
        tree.breadth_first(tree.root(), None)
            .into_iter()
            .filter(|&n| is_np(tree, n))
            .find_map(|n| accept(previous, n))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentBuilder, Sentence};

    fn build(sentences: &[&str], spans: &[(usize, usize, usize)]) -> (Document, Vec<MentionId>) {
        let mut b = DocumentBuilder::new("hobbs");
        for s in sentences {
            b.add_sentence(Sentence::parse(s).unwrap());
        }
        let ids = spans
            .iter()
            .map(|&(s, begin, end)| b.add_mention(s, begin, end).unwrap())
            .collect();
        (b.build(), ids)
    }

    #[test]
    fn test_possessor_needs_intervening_node() {
        let (doc, ids) = build(
            &["(ROOT (S (NP (NP (NNP John) (POS 's)) (NN father)) (VP (VBD loved) (NP (PRP him)))))"],
            &[(0, 0, 3), (0, 0, 2), (0, 4, 5)],
        );
        let (father, john, him) = (ids[0], ids[1], ids[2]);
        assert_eq!(find_antecedent(&doc, him, &Agreement::default()), john);
        assert_ne!(find_antecedent(&doc, him, &Agreement::default()), father);
    }

    #[test]
    fn test_climbs_out_of_embedded_clause() {
        let (doc, ids) = build(
            &["(ROOT (S (NP (NNP John)) (VP (VBD said) (SBAR (S (NP (PRP he)) (VP (VBD left)))))))"],
            &[(0, 0, 1), (0, 2, 3)],
        );
        assert_eq!(find_antecedent(&doc, ids[1], &Agreement::default()), ids[0]);
    }

    #[test]
    fn test_previous_sentence_respects_agreement() {
        let (doc, ids) = build(
            &[
                "(ROOT (S (NP (NNP Mary)) (VP (VBD met) (NP (NNP John)))))",
                "(ROOT (S (NP (PRP He)) (VP (VBD smiled))))",
            ],
            &[(0, 0, 1), (0, 2, 3), (1, 0, 1)],
        );
        // Mary is proposed first but is female.
        assert_eq!(find_antecedent(&doc, ids[2], &Agreement::default()), ids[1]);
    }

    #[test]
    fn test_most_recent_sentence_first() {
        let (doc, ids) = build(
            &[
                "(ROOT (S (NP (NNP Bob)) (VP (VBD ran))))",
                "(ROOT (S (NP (NNP Tom)) (VP (VBD sat))))",
                "(ROOT (S (NP (PRP He)) (VP (VBD slept))))",
            ],
            &[(0, 0, 1), (1, 0, 1), (2, 0, 1)],
        );
        assert_eq!(find_antecedent(&doc, ids[2], &Agreement::default()), ids[1]);
    }

    #[test]
    fn test_no_enclosing_clause_returns_sentinel() {
        let (doc, ids) = build(&["(ROOT (FRAG (NP (PRP it)) (. .)))"], &[(0, 0, 1)]);
        assert_eq!(find_antecedent(&doc, ids[0], &Agreement::default()), ids[0]);
    }

    #[test]
    fn test_no_candidate_returns_sentinel() {
        let (doc, ids) = build(
            &["(ROOT (S (NP (NNP Alice)) (VP (VBD saw) (NP (PRP him)))))"],
            &[(0, 0, 1), (0, 2, 3)],
        );
        assert_eq!(find_antecedent(&doc, ids[1], &Agreement::default()), ids[1]);
    }
}
