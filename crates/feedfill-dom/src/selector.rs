//! CSS selector subset.
//!
//! Supported grammar:
//!
//! ```text
//! list      := complex ( ',' complex )*
//! complex   := compound ( combinator compound )*
//! combinator:= whitespace | '>'
//! compound  := ( '*' | tag )? ( '#' ident | '.' ident | attribute )*
//! attribute := '[' name ( op value )? ']'      op: = ~= ^= $= *=
//! ```
//!
//! Values may be quoted with `"` or `'`. Names and tags compare ASCII
//! case-insensitively, attribute values compare exactly.

use std::fmt;
use std::str::FromStr;

use crate::error::DomError;
use crate::node::Node;

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    /// `(combinator to the previous compound, compound)`; the first
    /// combinator is unused.
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<AttributePredicate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributePredicate {
    name: String,
    op: AttributeOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttributeOp {
    Exists,
    Equals(String),
    /// `~=`: whitespace-separated word.
    Includes(String),
    Prefix(String),
    Suffix(String),
    Substring(String),
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let alternatives = Parser::new(source).parse_list()?;
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    /// Parse every selector in `sources` and join them into one list.
    pub fn parse_all<S: AsRef<str>>(sources: &[S]) -> Result<Self, DomError> {
        let mut alternatives = Vec::new();
        let mut joined = Vec::new();
        for source in sources {
            let selector = Self::parse(source.as_ref())?;
            joined.push(selector.source);
            alternatives.extend(selector.alternatives);
        }
        if alternatives.is_empty() {
            return Err(DomError::selector("", "empty selector list"));
        }
        Ok(Self {
            source: joined.join(", "),
            alternatives,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `node` matches any selector of the list.
    pub fn matches(&self, node: &Node) -> bool {
        self.alternatives.iter().any(|c| c.matches(node))
    }
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ============================================================================
// Matching
// ============================================================================

impl Complex {
    fn matches(&self, node: &Node) -> bool {
        Self::matches_parts(&self.parts, node)
    }

    fn matches_parts(parts: &[(Combinator, Compound)], node: &Node) -> bool {
        let Some(((combinator, compound), rest)) = parts.split_last() else {
            return false;
        };
        if !compound.matches(node) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        match combinator {
            Combinator::Child => node
                .parent()
                .map(|parent| Self::matches_parts(rest, &parent))
                .unwrap_or(false),
            Combinator::Descendant => node
                .ancestors()
                .iter()
                .any(|ancestor| Self::matches_parts(rest, ancestor)),
        }
    }
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        let Some(tag) = node.tag_name() else {
            return false;
        };
        if let Some(ref want) = self.tag {
            if !tag.eq_ignore_ascii_case(want) {
                return false;
            }
        }
        if !self.ids.is_empty() {
            let id = node.attribute("id");
            if !self.ids.iter().all(|want| id.as_deref() == Some(want.as_str())) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| node.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|a| a.matches(node))
    }
}

impl AttributePredicate {
    fn matches(&self, node: &Node) -> bool {
        let Some(value) = node.attribute(&self.name) else {
            return false;
        };
        match &self.op {
            AttributeOp::Exists => true,
            AttributeOp::Equals(want) => value == *want,
            AttributeOp::Includes(want) => value.split_whitespace().any(|w| w == want),
            AttributeOp::Prefix(want) => !want.is_empty() && value.starts_with(want.as_str()),
            AttributeOp::Suffix(want) => !want.is_empty() && value.ends_with(want.as_str()),
            AttributeOp::Substring(want) => !want.is_empty() && value.contains(want.as_str()),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::selector(self.source, reason)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(&mut self) -> Result<Vec<Complex>, DomError> {
        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            list.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.bump() {
                None => break,
                Some(',') => continue,
                Some(c) => return Err(self.error(format!("unexpected '{}'", c))),
            }
        }
        Ok(list)
    }

    fn parse_complex(&mut self) -> Result<Complex, DomError> {
        let mut parts = vec![(Combinator::Descendant, self.parse_compound()?)];
        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(',') | None => break,
                Some(_) if had_space => Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected '{}'", c))),
            };
            parts.push((combinator, self.parse_compound()?));
        }
        Ok(Complex { parts })
    }

    fn parse_compound(&mut self) -> Result<Compound, DomError> {
        let mut compound = Compound::default();
        let mut empty = true;

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                empty = false;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
                empty = false;
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.ids.push(self.parse_ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.parse_ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attributes.push(self.parse_attribute()?);
                }
                _ => break,
            }
            empty = false;
        }

        if empty {
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected a selector, found '{}'", c)),
                None => self.error("expected a selector"),
            });
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String, DomError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_attribute(&mut self) -> Result<AttributePredicate, DomError> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let op = match self.bump() {
            Some(']') => return Ok(AttributePredicate {
                name,
                op: AttributeOp::Exists,
            }),
            Some('=') => "=",
            Some(c @ ('~' | '^' | '$' | '*')) => {
                if self.bump() != Some('=') {
                    return Err(self.error(format!("expected '=' after '{}'", c)));
                }
                match c {
                    '~' => "~=",
                    '^' => "^=",
                    '$' => "$=",
                    _ => "*=",
                }
            }
            Some(c) => return Err(self.error(format!("unexpected '{}' in attribute", c))),
            None => return Err(self.error("unterminated attribute selector")),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.parse_quoted(quote)?
            }
            _ => self.parse_ident()?,
        };
        self.skip_whitespace();
        if self.bump() != Some(']') {
            return Err(self.error("expected ']'"));
        }

        let op = match op {
            "=" => AttributeOp::Equals(value),
            "~=" => AttributeOp::Includes(value),
            "^=" => AttributeOp::Prefix(value),
            "$=" => AttributeOp::Suffix(value),
            _ => AttributeOp::Substring(value),
        };
        Ok(AttributePredicate { name, op })
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, DomError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) => value.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
