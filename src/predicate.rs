use regex::{Regex, RegexBuilder};

use crate::tree::Node;
use crate::Result;

/// Decides whether a single node matches. Implementations should not have
/// side effects; an `Err` is treated as "no match" for that node.
pub trait Predicate<T> {
    fn evaluate(&self, node: &Node<T>) -> Result<bool>;
}

impl<T, F> Predicate<T> for F
where
    F: Fn(&Node<T>) -> bool,
{
    fn evaluate(&self, node: &Node<T>) -> Result<bool> {
        Ok(self(node))
    }
}

/// Case-insensitive literal substring match on the node title.
#[derive(Debug, Clone)]
pub struct TextPredicate {
    re: Regex,
}

impl TextPredicate {
    /// Metacharacters in `text` are escaped, so `a.b` only matches a literal
    /// dot. Fails only if the escaped pattern exceeds the regex size limit.
    pub fn new(text: &str) -> Result<Self> {
        let re = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()?;
        Ok(Self { re })
    }

    pub fn regex(&self) -> &Regex {
        &self.re
    }
}

impl<T> Predicate<T> for TextPredicate {
    fn evaluate(&self, node: &Node<T>) -> Result<bool> {
        Ok(self.re.is_match(node.title()))
    }
}

/// Regular expression match on the node title.
#[derive(Debug, Clone)]
pub struct PatternPredicate {
    re: Regex,
}

impl PatternPredicate {
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()?;
        Ok(Self { re })
    }

    pub fn regex(&self) -> &Regex {
        &self.re
    }
}

impl<T> Predicate<T> for PatternPredicate {
    fn evaluate(&self, node: &Node<T>) -> Result<bool> {
        Ok(self.re.is_match(node.title()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeBuilder, Tree};
    use crate::Error;

    fn leaf(title: &str) -> Tree<()> {
        Tree::new(NodeBuilder::leaf(title, ()))
    }

    fn text_matches(text: &str, title: &str) -> bool {
        let tree = leaf(title);
        TextPredicate::new(text)
            .unwrap()
            .evaluate(tree.node(tree.root()))
            .unwrap()
    }

    #[test]
    fn text_is_case_insensitive_substring() {
        assert!(text_matches("target", "The TARGET file"));
        assert!(text_matches("TaRg", "target"));
        assert!(!text_matches("targets", "target"));
    }

    #[test]
    fn text_metacharacters_match_literally() {
        assert!(text_matches("a.b", "xa.by"));
        assert!(!text_matches("a.b", "axb"));
        assert!(text_matches("(x)*", "f(x)*g"));
        assert!(text_matches("[", "a[b"));
        assert!(text_matches("^$|-\\", "^$|-\\"));
        assert!(!text_matches("^a", "a"));
    }

    #[test]
    fn empty_title_only_matches_empty_text() {
        assert!(text_matches("", ""));
        assert!(!text_matches("x", ""));
    }

    #[test]
    fn pattern_honours_case_sensitivity() {
        let tree = leaf("Cargo.toml");
        let node = tree.node(tree.root());

        let insensitive = PatternPredicate::new("^cargo\\.", false).unwrap();
        assert!(insensitive.evaluate(node).unwrap());

        let sensitive = PatternPredicate::new("^cargo\\.", true).unwrap();
        assert!(!sensitive.evaluate(node).unwrap());
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = PatternPredicate::new("(unclosed", false).unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }

    #[test]
    fn closures_are_predicates() {
        let tree = leaf("x");
        let is_leaf = |node: &Node<()>| node.is_leaf();
        assert!(is_leaf.evaluate(tree.node(tree.root())).unwrap());
    }
}
