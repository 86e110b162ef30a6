//! Namespace-free path expressions over an XML element tree.
//!
//! Supported forms:
//!
//! - `Project/ItemGroup/Content`: child steps by local name
//! - `//Content`: descendants at any depth
//! - `ItemGroup/*[@Include='a.ts']`: wildcard step with an attribute test
//!
//! Steps match on an element's local name, so a document declaring a
//! default namespace is queried exactly like one that does not. A prefix in
//! the expression (`msb:Content`) is ignored for the same reason.
//!
//! An `@Include` test compares logical paths rather than raw text, so
//! `[@Include='web/site.css']` finds `Include="Web\Site.css"`. Other
//! attributes compare exactly.
//!
//! A path starting with `/` begins at the document, so its first step must
//! name the root element. A relative path may begin either at the root
//! element's name or directly below it.

use std::fmt;

use graft_core::domain::LogicalPath;
use thiserror::Error;
use xmltree::{Element, XMLNode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Empty query expression")]
    Empty,

    #[error("Invalid query '{expr}': {reason}")]
    Invalid { expr: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    /// `None` for `*`.
    name: Option<String>,
    attribute: Option<(String, String)>,
}

impl Step {
    fn matches(&self, element: &Element) -> bool {
        let name_ok = self.name.as_deref().is_none_or(|n| n == element.name);
        name_ok
            && self
                .attribute
                .as_ref()
                .is_none_or(|(attr, value)| {
                    element
                        .attributes
                        .get(attr)
                        .is_some_and(|actual| attribute_eq(attr, actual, value))
                })
    }
}

fn attribute_eq(attr: &str, actual: &str, expected: &str) -> bool {
    if attr != "Include" {
        return actual == expected;
    }
    match (LogicalPath::parse(actual), LogicalPath::parse(expected)) {
        (Ok(a), Ok(b)) => a == b,
        _ => actual == expected,
    }
}

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPath {
    expr: String,
    absolute: bool,
    steps: Vec<Step>,
}

impl QueryPath {
    pub fn parse(expr: &str) -> Result<Self, QueryError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        let invalid = |reason: &str| QueryError::Invalid {
            expr: expr.to_string(),
            reason: reason.to_string(),
        };

        let (absolute, mut axis, body) = if let Some(rest) = trimmed.strip_prefix("//") {
            (true, Axis::Descendant, rest)
        } else if let Some(rest) = trimmed.strip_prefix('/') {
            (true, Axis::Child, rest)
        } else {
            (false, Axis::Child, trimmed)
        };

        let mut steps = Vec::new();
        let segments = split_segments(body).map_err(|reason| invalid(reason))?;
        let last = segments.len().saturating_sub(1);
        for (i, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                if axis == Axis::Descendant || i == last {
                    return Err(invalid("empty step"));
                }
                axis = Axis::Descendant;
                continue;
            }
            steps.push(parse_step(segment, axis).map_err(|reason| invalid(reason))?);
            axis = Axis::Child;
        }
        if steps.is_empty() {
            return Err(invalid("no steps"));
        }

        Ok(Self {
            expr: expr.to_string(),
            absolute,
            steps,
        })
    }

    /// Every element matching the path, in document order.
    pub fn select<'a>(&self, root: &'a Element) -> Vec<&'a Element> {
        let (first, rest) = match self.steps.split_first() {
            Some(split) => split,
            None => return Vec::new(),
        };

        let starts_at_document = self.absolute || first.axis == Axis::Descendant || first.matches(root);
        let mut current: Vec<&Element> = if starts_at_document {
            let mut seed = Vec::new();
            if first.matches(root) {
                seed.push(root);
            }
            if first.axis == Axis::Descendant {
                collect_descendants(root, first, &mut seed);
            }
            seed
        } else {
            apply(&[root], first)
        };

        for step in rest {
            current = apply(&current, step);
        }
        current
    }

    pub fn as_str(&self) -> &str {
        &self.expr
    }
}

impl fmt::Display for QueryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

fn apply<'a>(context: &[&'a Element], step: &Step) -> Vec<&'a Element> {
    let mut out: Vec<&'a Element> = Vec::new();
    for element in context {
        match step.axis {
            Axis::Child => out.extend(child_elements(element).filter(|c| step.matches(c))),
            Axis::Descendant => collect_descendants(element, step, &mut out),
        }
    }
    // Overlapping descendant contexts can reach the same node twice.
    let mut seen: Vec<*const Element> = Vec::with_capacity(out.len());
    out.retain(|e| {
        let ptr: *const Element = *e;
        if seen.contains(&ptr) {
            false
        } else {
            seen.push(ptr);
            true
        }
    });
    out
}

fn collect_descendants<'a>(element: &'a Element, step: &Step, out: &mut Vec<&'a Element>) {
    for child in child_elements(element) {
        if step.matches(child) {
            out.push(child);
        }
        collect_descendants(child, step, out);
    }
}

pub(crate) fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(e) => Some(e),
        _ => None,
    })
}

/// Split on `/` outside of `[...]` predicates.
fn split_segments(body: &str) -> Result<Vec<&str>, &'static str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.checked_sub(1).ok_or("unbalanced ']'")?,
            (None, '/') if depth == 0 => {
                segments.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() || depth != 0 {
        return Err("unterminated predicate");
    }
    segments.push(&body[start..]);
    Ok(segments)
}

fn parse_step(segment: &str, axis: Axis) -> Result<Step, &'static str> {
    let (name, predicate) = match segment.find('[') {
        Some(idx) => {
            let pred = segment[idx..]
                .strip_prefix('[')
                .and_then(|p| p.strip_suffix(']'))
                .ok_or("malformed predicate")?;
            (&segment[..idx], Some(pred))
        }
        None => (segment, None),
    };

    let name = name.trim();
    let name = match name {
        "" => return Err("missing element name"),
        "*" => None,
        n if n.chars().any(char::is_whitespace) => return Err("whitespace in element name"),
        n => Some(n.rsplit(':').next().unwrap_or(n).to_string()),
    };

    let attribute = predicate.map(parse_attribute_test).transpose()?;
    Ok(Step {
        axis,
        name,
        attribute,
    })
}

/// `@Name='value'` or `@Name="value"`.
fn parse_attribute_test(predicate: &str) -> Result<(String, String), &'static str> {
    let rest = predicate
        .trim()
        .strip_prefix('@')
        .ok_or("only attribute tests are supported")?;
    let (attr, value) = rest.split_once('=').ok_or("expected '@name=value'")?;
    let value = value.trim();
    let unquoted = value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
        .ok_or("attribute value must be quoted")?;
    let attr = attr.trim();
    if attr.is_empty() {
        return Err("missing attribute name");
    }
    Ok((
        attr.rsplit(':').next().unwrap_or(attr).to_string(),
        unquoted.to_string(),
    ))
}
