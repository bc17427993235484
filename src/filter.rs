//! Text filtering over the forest.
//!
//! Filtering is a pure view: it never writes to expansion or selection
//! state, so clearing the query brings back exactly the previous tree.

use crate::tree::Node;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How a query is compared against node labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-sensitive substring
    #[default]
    Substring,
    /// Regular expression; an invalid pattern is matched as a substring
    Pattern,
    /// Skim-style fuzzy match
    Fuzzy,
}

enum Matcher {
    All,
    Substring(String),
    Pattern(Regex),
    Fuzzy(String, SkimMatcherV2),
}

/// A compiled query
pub struct Filter {
    query: String,
    matcher: Matcher,
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter").field("query", &self.query).finish()
    }
}

impl Filter {
    pub fn new(query: &str, mode: MatchMode) -> Self {
        let matcher = if query.is_empty() {
            Matcher::All
        } else {
            match mode {
                MatchMode::Substring => Matcher::Substring(query.to_string()),
                MatchMode::Pattern => match Regex::new(query) {
                    Ok(re) => Matcher::Pattern(re),
                    Err(e) => {
                        log::debug!("Filter: invalid pattern {:?} ({}), matching literally", query, e);
                        Matcher::Substring(query.to_string())
                    }
                },
                MatchMode::Fuzzy => Matcher::Fuzzy(query.to_string(), SkimMatcherV2::default()),
            }
        };
        Self {
            query: query.to_string(),
            matcher,
        }
    }

    /// A filter that lets everything through
    pub fn all() -> Self {
        Self::new("", MatchMode::Substring)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.matcher, Matcher::All)
    }

    /// Does this label match on its own?
    pub fn matches_label(&self, label: &str) -> bool {
        match &self.matcher {
            Matcher::All => true,
            Matcher::Substring(needle) => label.contains(needle.as_str()),
            Matcher::Pattern(re) => re.is_match(label),
            Matcher::Fuzzy(pattern, matcher) => matcher.fuzzy_match(label, pattern).is_some(),
        }
    }
}

/// A node survives the filter if its own label matches or any descendant's does
pub fn matches(node: &Node, filter: &Filter) -> bool {
    filter.is_empty()
        || filter.matches_label(&node.name)
        || node.children.iter().any(|child| matches(child, filter))
}

/// The forest with every non-matching subtree pruned
pub fn visible_forest(roots: &[Node], filter: &Filter) -> Vec<Node> {
    if filter.is_empty() {
        return roots.to_vec();
    }
    roots
        .iter()
        .filter(|node| matches(node, filter))
        .map(|node| Node {
            id: node.id.clone(),
            name: node.name.clone(),
            parent_id: node.parent_id.clone(),
            children: visible_forest(&node.children, filter),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Forest, NodeId};

    fn create_test_forest() -> Forest {
        Forest::new(vec![
            Node::branch(1, "Fruit", vec![Node::leaf(2, "Apple"), Node::leaf(3, "Banana")]),
            Node::branch(
                4,
                "Vegetables",
                vec![Node::branch(5, "Roots", vec![Node::leaf(6, "Carrot")])],
            ),
        ])
        .unwrap()
    }

    fn ids(nodes: &[Node]) -> Vec<String> {
        let mut out = Vec::new();
        for node in nodes {
            out.push(node.id.to_string());
            out.extend(ids(&node.children));
        }
        out
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let forest = create_test_forest();
        let filter = Filter::new("", MatchMode::Substring);
        assert!(filter.is_empty());
        assert!(forest.roots().iter().all(|n| matches(n, &filter)));
        assert_eq!(visible_forest(forest.roots(), &filter), forest.roots().to_vec());
    }

    #[test]
    fn test_prunes_non_matching_siblings() {
        let forest = create_test_forest();
        let filter = Filter::new("App", MatchMode::Substring);
        let visible = visible_forest(forest.roots(), &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, NodeId::from(1));
        assert_eq!(ids(&visible), vec!["1", "2"]);
    }

    #[test]
    fn test_ancestors_of_match_survive() {
        let forest = create_test_forest();
        let filter = Filter::new("Carrot", MatchMode::Substring);
        assert!(matches(&forest.roots()[1], &filter));
        assert!(!matches(&forest.roots()[0], &filter));
        assert_eq!(ids(&visible_forest(forest.roots(), &filter)), vec!["4", "5", "6"]);
    }

    #[test]
    fn test_matching_branch_drops_unmatched_children() {
        let forest = create_test_forest();
        let filter = Filter::new("Fruit", MatchMode::Substring);
        let visible = visible_forest(forest.roots(), &filter);
        assert_eq!(ids(&visible), vec!["1"]);
        assert!(visible[0].is_leaf());
    }

    #[test]
    fn test_substring_is_case_sensitive() {
        let filter = Filter::new("apple", MatchMode::Substring);
        assert!(!filter.matches_label("Apple"));
        assert!(filter.matches_label("pineapple"));
    }

    #[test]
    fn test_no_results() {
        let forest = create_test_forest();
        let filter = Filter::new("zzz", MatchMode::Substring);
        assert!(visible_forest(forest.roots(), &filter).is_empty());
    }

    #[test]
    fn test_pattern_mode() {
        let filter = Filter::new("^Ban", MatchMode::Pattern);
        assert!(filter.matches_label("Banana"));
        assert!(!filter.matches_label("Urban"));

        // Invalid regex falls back to a literal match
        let broken = Filter::new("(", MatchMode::Pattern);
        assert!(broken.matches_label("f(x)"));
        assert!(!broken.matches_label("fx"));
    }

    #[test]
    fn test_fuzzy_mode() {
        let filter = Filter::new("crt", MatchMode::Fuzzy);
        assert!(filter.matches_label("Carrot"));
        assert!(!filter.matches_label("Apple"));
    }
}
