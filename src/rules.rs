//! Rule registry
//!
//! A rule pairs a [`Filter`] (a set of tag names or a predicate over the
//! [`NodeView`]) with a [`Replacement`] function `(content, node, options) ->
//! text`. The [`RuleSet`] owned by each converter holds the shared standard
//! table plus the caller's custom rules, keep filters and remove filters, and
//! resolves every element to exactly one [`Resolution`]:
//!
//! 1. a matching remove filter elides the node and its subtree;
//! 2. a matching custom rule wins, most recently registered first;
//! 3. a matching keep filter emits the original markup, unless the standard
//!    table claims the node;
//! 4. a blank node uses the blank replacement;
//! 5. the matching standard rule is applied;
//! 6. anything left uses the default replacement.
//!
//! Tables are checked by the converter before step 2.

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::node::NodeView;
use crate::options::ConversionOptions;
use crate::org_rules::{OrgRule, RuleTable};

/// Signature of a replacement function
pub type ReplacementFn =
    dyn Fn(&str, &NodeView<'_>, &ConversionOptions) -> String + Send + Sync;

/// Signature of a filter predicate
pub type PredicateFn = dyn Fn(&NodeView<'_>) -> bool + Send + Sync;

/// Shared, cloneable replacement function
#[derive(Clone)]
pub struct Replacement(Arc<ReplacementFn>);

impl Replacement {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &NodeView<'_>, &ConversionOptions) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, content: &str, node: &NodeView<'_>, options: &ConversionOptions) -> String {
        (self.0)(content, node, options)
    }

    /// Block nodes become a paragraph break, inline nodes disappear
    pub fn blank() -> Self {
        Self::new(|_, node, _| {
            if node.is_block {
                "\n\n".to_string()
            } else {
                String::new()
            }
        })
    }

    /// The node's original markup, on its own paragraph when it is a block
    pub fn keep() -> Self {
        Self::new(|_, node, _| {
            if node.is_block {
                format!("\n\n{}\n\n", node.outer_html())
            } else {
                node.outer_html()
            }
        })
    }

    /// The converted content, on its own paragraph when the node is a block
    pub fn default_block() -> Self {
        Self::new(|content, node, _| {
            if node.is_block {
                format!("\n\n{}\n\n", content.trim_matches('\n'))
            } else {
                content.to_string()
            }
        })
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Replacement(..)")
    }
}

/// Selects the elements a rule, keep or remove entry applies to
#[derive(Clone)]
pub enum Filter {
    /// Lowercase tag names
    Tags(Vec<String>),
    Predicate(Arc<PredicateFn>),
}

impl Filter {
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Filter::Tags(
            tags.into_iter()
                .map(|tag| tag.as_ref().to_ascii_lowercase())
                .collect(),
        )
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&NodeView<'_>) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Arc::new(f))
    }

    /// Whether the filter selects `node`. Only elements can match.
    pub fn matches(&self, node: &NodeView<'_>) -> bool {
        let Some(tag) = node.tag() else {
            return false;
        };
        match self {
            Filter::Tags(tags) => tags.iter().any(|candidate| candidate == tag),
            Filter::Predicate(predicate) => predicate(node),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Tags(tags) => f.debug_tuple("Tags").field(tags).finish(),
            Filter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for Filter {
    fn from(tag: &str) -> Self {
        Filter::tags([tag])
    }
}

impl From<&[&str]> for Filter {
    fn from(tags: &[&str]) -> Self {
        Filter::tags(tags)
    }
}

impl<const N: usize> From<[&str; N]> for Filter {
    fn from(tags: [&str; N]) -> Self {
        Filter::tags(tags)
    }
}

impl From<Vec<&str>> for Filter {
    fn from(tags: Vec<&str>) -> Self {
        Filter::tags(tags)
    }
}

/// A caller-supplied conversion rule
#[derive(Clone, Debug)]
pub struct Rule {
    pub filter: Filter,
    pub replacement: Replacement,
}

impl Rule {
    pub fn new<F>(filter: impl Into<Filter>, replacement: F) -> Self
    where
        F: Fn(&str, &NodeView<'_>, &ConversionOptions) -> String + Send + Sync + 'static,
    {
        Self {
            filter: filter.into(),
            replacement: Replacement::new(replacement),
        }
    }
}

/// How one element is converted
#[derive(Debug)]
pub enum Resolution<'r> {
    Remove,
    Custom(&'r str, &'r Rule),
    Keep,
    Blank,
    Standard(OrgRule),
    Default,
}

/// Standard table plus registered rules and filters
#[derive(Clone, Debug)]
pub struct RuleSet {
    standard: Arc<RuleTable>,
    /// Registration order; later entries take precedence
    custom: Vec<(String, Rule)>,
    keep: Vec<Filter>,
    remove: Vec<Filter>,
}

impl RuleSet {
    pub fn new(standard: Arc<RuleTable>) -> Self {
        Self {
            standard,
            custom: Vec::new(),
            keep: Vec::new(),
            remove: Vec::new(),
        }
    }

    /// Register a rule under `key`, replacing and taking precedence over any
    /// rule previously registered under the same key
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.custom.retain(|(existing, _)| existing != key);
        self.custom.push((key.to_string(), rule));
    }

    pub fn keep(&mut self, filter: Filter) {
        self.keep.push(filter);
    }

    pub fn remove(&mut self, filter: Filter) {
        self.remove.push(filter);
    }

    pub fn standard(&self) -> &RuleTable {
        &self.standard
    }

    pub fn is_removed(&self, node: &NodeView<'_>) -> bool {
        self.remove.iter().rev().any(|filter| filter.matches(node))
    }

    /// Resolve the conversion outcome for an element
    pub fn resolve(&self, node: &NodeView<'_>) -> Resolution<'_> {
        if self.is_removed(node) {
            trace!("<{}> removed", node.tag().unwrap_or_default());
            return Resolution::Remove;
        }

        if let Some((key, rule)) = self
            .custom
            .iter()
            .rev()
            .find(|(_, rule)| rule.filter.matches(node))
        {
            trace!("<{}> matched custom rule '{}'", node.tag().unwrap_or_default(), key);
            return Resolution::Custom(key, rule);
        }

        let standard = self.standard.find(node);

        if standard.is_none() && self.keep.iter().rev().any(|filter| filter.matches(node)) {
            trace!("<{}> kept as markup", node.tag().unwrap_or_default());
            return Resolution::Keep;
        }

        if node.is_blank {
            return Resolution::Blank;
        }

        match standard {
            Some(rule) => Resolution::Standard(rule),
            None => Resolution::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    fn resolve_first_child(rules: &RuleSet, root: &Node) -> String {
        let root_view = NodeView::root(root);
        let view = NodeView::child(&root_view, 0).expect("child");
        match rules.resolve(&view) {
            Resolution::Remove => "remove".to_string(),
            Resolution::Custom(key, _) => format!("custom:{key}"),
            Resolution::Keep => "keep".to_string(),
            Resolution::Blank => "blank".to_string(),
            Resolution::Standard(rule) => format!("standard:{rule:?}"),
            Resolution::Default => "default".to_string(),
        }
    }

    fn paragraph() -> Node {
        Node::fragment(vec![Node::element("p").with_child(Node::text("x"))])
    }

    #[test]
    fn test_standard_rule_resolution() {
        let rules = RuleSet::new(RuleTable::standard());
        assert_eq!(resolve_first_child(&rules, &paragraph()), "standard:Paragraph");
    }

    #[test]
    fn test_unknown_tag_uses_default() {
        let rules = RuleSet::new(RuleTable::standard());
        let root = Node::fragment(vec![Node::element("section").with_child(Node::text("x"))]);
        assert_eq!(resolve_first_child(&rules, &root), "default");
    }

    #[test]
    fn test_blank_node() {
        let rules = RuleSet::new(RuleTable::standard());
        let root = Node::fragment(vec![Node::element("p")]);
        assert_eq!(resolve_first_child(&rules, &root), "blank");
    }

    #[test]
    fn test_remove_beats_everything() {
        let mut rules = RuleSet::new(RuleTable::standard());
        rules.add("p", Rule::new("p", |content, _, _| content.to_string()));
        rules.keep(Filter::from("p"));
        rules.remove(Filter::from("p"));
        assert_eq!(resolve_first_child(&rules, &paragraph()), "remove");
    }

    #[test]
    fn test_custom_rule_beats_standard() {
        let mut rules = RuleSet::new(RuleTable::standard());
        rules.add("para", Rule::new("p", |content, _, _| content.to_string()));
        assert_eq!(resolve_first_child(&rules, &paragraph()), "custom:para");
    }

    #[test]
    fn test_most_recent_custom_rule_wins() {
        let mut rules = RuleSet::new(RuleTable::standard());
        rules.add("first", Rule::new("p", |_, _, _| "1".to_string()));
        rules.add("second", Rule::new(["p", "div"], |_, _, _| "2".to_string()));
        assert_eq!(resolve_first_child(&rules, &paragraph()), "custom:second");

        // Re-registering a key moves it to the front
        rules.add("first", Rule::new("p", |_, _, _| "1".to_string()));
        assert_eq!(resolve_first_child(&rules, &paragraph()), "custom:first");
    }

    #[test]
    fn test_keep_does_not_override_standard_rule() {
        let mut rules = RuleSet::new(RuleTable::standard());
        rules.keep(Filter::from(["p", "section"]));
        assert_eq!(resolve_first_child(&rules, &paragraph()), "standard:Paragraph");

        let root = Node::fragment(vec![Node::element("section").with_child(Node::text("x"))]);
        assert_eq!(resolve_first_child(&rules, &root), "keep");
    }

    #[test]
    fn test_keep_applies_to_blank_nodes() {
        let mut rules = RuleSet::new(RuleTable::standard());
        rules.keep(Filter::from("span"));
        let root = Node::fragment(vec![Node::element("span")]);
        assert_eq!(resolve_first_child(&rules, &root), "keep");
    }

    #[test]
    fn test_predicate_filter() {
        let mut rules = RuleSet::new(RuleTable::standard());
        rules.remove(Filter::predicate(|node| node.attr("class") == Some("ad")));
        let root = Node::fragment(vec![
            Node::element("div")
                .with_attr("class", "ad")
                .with_child(Node::text("buy")),
        ]);
        assert_eq!(resolve_first_child(&rules, &root), "remove");
    }

    #[test]
    fn test_filters_never_match_text() {
        let filter = Filter::predicate(|_| true);
        let root = Node::fragment(vec![Node::text("x")]);
        let root_view = NodeView::root(&root);
        let text = NodeView::child(&root_view, 0).expect("text child");
        assert!(!filter.matches(&text));
    }

    #[test]
    fn test_fallback_replacements() {
        let options = ConversionOptions::default();
        let root = Node::fragment(vec![
            Node::element("div").with_child(Node::text("x")),
            Node::element("span").with_child(Node::text("y")),
        ]);
        let root_view = NodeView::root(&root);
        let div = NodeView::child(&root_view, 0).expect("div");
        let span = NodeView::child(&root_view, 1).expect("span");

        assert_eq!(Replacement::blank().apply("", &div, &options), "\n\n");
        assert_eq!(Replacement::blank().apply("", &span, &options), "");
        assert_eq!(
            Replacement::keep().apply("x", &div, &options),
            "\n\n<div>x</div>\n\n"
        );
        assert_eq!(Replacement::keep().apply("y", &span, &options), "<span>y</span>");
        assert_eq!(
            Replacement::default_block().apply("x", &div, &options),
            "\n\nx\n\n"
        );
        assert_eq!(Replacement::default_block().apply("y", &span, &options), "y");
    }
}
