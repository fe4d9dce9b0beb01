//! Facet (aggregation) filters selected by the user.
//!
//! A filter is a chain of `field:value` segments. A plain facet selection is
//! a chain of one (`type:publication`); selecting a sub-facet extends the
//! chain (`type:publication+subtype:article`). A backslash escapes a literal
//! `+`, `:` or `\` inside a field or value (`lang:C\+\+`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StateError;

const SEGMENT_SEPARATOR: char = '+';
const VALUE_SEPARATOR: char = ':';
const ESCAPE: char = '\\';

/// A selected facet value, optionally narrowed by a nested selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregationFilter {
    /// Facet field name.
    pub field: String,
    /// Selected bucket key.
    pub value: String,
    /// Nested selection under this bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<AggregationFilter>>,
}

impl AggregationFilter {
    /// Create a single-segment filter.
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            child: None,
        }
    }

    /// Append `child` below the deepest segment of this filter.
    #[must_use]
    pub fn with_child(mut self, child: AggregationFilter) -> Self {
        self.attach(child);
        self
    }

    fn attach(&mut self, child: AggregationFilter) {
        if let Some(next) = self.child.as_mut() {
            next.attach(child);
        } else {
            self.child = Some(Box::new(child));
        }
    }

    /// The `(field, value)` segments from the root to the deepest selection.
    pub fn path(&self) -> Vec<(&str, &str)> {
        let mut segments = Vec::new();
        let mut current = Some(self);
        while let Some(filter) = current {
            segments.push((filter.field.as_str(), filter.value.as_str()));
            current = filter.child.as_deref();
        }
        segments
    }

    /// Number of segments in the chain.
    pub fn depth(&self) -> usize {
        1 + self.child.as_ref().map_or(0, |child| child.depth())
    }

    /// Returns `true` if `prefix` selects this filter or one of its parents.
    pub fn starts_with(&self, prefix: &AggregationFilter) -> bool {
        let own = self.path();
        let prefix = prefix.path();
        own.len() >= prefix.len() && own[..prefix.len()] == prefix[..]
    }
}

impl fmt::Display for AggregationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (field, value)) in self.path().into_iter().enumerate() {
            if idx > 0 {
                write!(f, "{SEGMENT_SEPARATOR}")?;
            }
            write_escaped(f, field, &[ESCAPE, SEGMENT_SEPARATOR, VALUE_SEPARATOR])?;
            write!(f, "{VALUE_SEPARATOR}")?;
            write_escaped(f, value, &[ESCAPE, SEGMENT_SEPARATOR])?;
        }
        Ok(())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str, special: &[char]) -> fmt::Result {
    for c in text.chars() {
        if special.contains(&c) {
            write!(f, "{ESCAPE}")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

impl FromStr for AggregationFilter {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| StateError::InvalidFilter {
            input: s.to_string(),
            reason,
        };

        let segment = |field: &str, value: &str, has_value: bool| {
            if !has_value {
                return Err(invalid("segment is missing ':'"));
            }
            let field = field.trim();
            let value = value.trim();
            if field.is_empty() {
                return Err(invalid("empty field name"));
            }
            if value.is_empty() {
                return Err(invalid("empty value"));
            }
            Ok(AggregationFilter::new(field, value))
        };

        let mut segments = Vec::new();
        let mut field = String::new();
        let mut value = String::new();
        let mut has_value = false;
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            match c {
                SEGMENT_SEPARATOR => {
                    segments.push(segment(&field, &value, has_value)?);
                    field.clear();
                    value.clear();
                    has_value = false;
                }
                // Only the first unescaped ':' splits; later ones belong to the value.
                VALUE_SEPARATOR if !has_value => has_value = true,
                _ => {
                    let literal = if c == ESCAPE {
                        chars.next().ok_or_else(|| invalid("dangling escape"))?
                    } else {
                        c
                    };
                    if has_value {
                        value.push(literal);
                    } else {
                        field.push(literal);
                    }
                }
            }
        }
        segments.push(segment(&field, &value, has_value)?);

        // Build the chain from the deepest segment upwards.
        let mut chain: Option<AggregationFilter> = None;
        while let Some(mut segment) = segments.pop() {
            segment.child = chain.map(Box::new);
            chain = Some(segment);
        }
        chain.ok_or_else(|| invalid("no segments"))
    }
}

/// Select or deselect `filter`.
///
/// Deselecting also drops every selection nested below it, so a sub-facet
/// never outlives its parent.
pub fn toggle_filter(selected: &mut Vec<AggregationFilter>, filter: AggregationFilter) {
    if selected.contains(&filter) {
        selected.retain(|existing| !existing.starts_with(&filter));
    } else {
        selected.push(filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> AggregationFilter {
        AggregationFilter::new("type", "publication")
            .with_child(AggregationFilter::new("subtype", "article"))
    }

    #[test]
    fn display_joins_segments() {
        assert_eq!(nested().to_string(), "type:publication+subtype:article");
        assert_eq!(nested().depth(), 2);
    }

    #[test]
    fn parse_builds_nested_chain() {
        let parsed: AggregationFilter = "type:publication+subtype:article".parse().unwrap();
        assert_eq!(parsed, nested());
    }

    #[test]
    fn parse_keeps_colons_inside_values() {
        let parsed: AggregationFilter = "date:2019-01-01T00:00".parse().unwrap();
        assert_eq!(parsed.value, "2019-01-01T00:00");
    }

    #[test]
    fn separators_inside_values_are_escaped() {
        let filter = AggregationFilter::new("lang", "C++")
            .with_child(AggregationFilter::new("std:rev", "c\\17"));

        let text = filter.to_string();

        assert_eq!(text, r"lang:C\+\++std\:rev:c\\17");
        assert_eq!(text.parse::<AggregationFilter>().unwrap(), filter);
    }

    #[test]
    fn parse_rejects_dangling_escape() {
        assert!(r"lang:C\".parse::<AggregationFilter>().is_err());
    }

    #[test]
    fn parse_rejects_malformed_segments() {
        assert!("type".parse::<AggregationFilter>().is_err());
        assert!(":value".parse::<AggregationFilter>().is_err());
        assert!("type:".parse::<AggregationFilter>().is_err());
        assert!("type:a+".parse::<AggregationFilter>().is_err());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selected = Vec::new();
        let filter = AggregationFilter::new("type", "dataset");

        toggle_filter(&mut selected, filter.clone());
        assert_eq!(selected, vec![filter.clone()]);

        toggle_filter(&mut selected, filter);
        assert!(selected.is_empty());
    }

    #[test]
    fn deselecting_parent_drops_children() {
        let parent = AggregationFilter::new("type", "publication");
        let other = AggregationFilter::new("type", "dataset");
        let mut selected = vec![parent.clone(), nested(), other.clone()];

        toggle_filter(&mut selected, parent);

        assert_eq!(selected, vec![other]);
    }

    #[test]
    fn deselecting_child_keeps_parent() {
        let parent = AggregationFilter::new("type", "publication");
        let mut selected = vec![parent.clone(), nested()];

        toggle_filter(&mut selected, nested());

        assert_eq!(selected, vec![parent]);
    }
}
