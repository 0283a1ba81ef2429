//! Selector parsing and matching.
//!
//! Covers the syntax the selector engine generates and checks uniqueness
//! with: compound selectors of type/id/class/attribute/nth-child/root
//! components joined by child (`>`) or descendant (whitespace) combinators.
//! Identifier and string escapes are decoded during parsing, so escaped
//! output round-trips back to the literal names it was built from.

use std::iter::Peekable;
use std::str::Chars;

use crate::node::NodeData;
use crate::{Document, NodeId};

/// Selector parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected character `{0}` in selector")]
    UnexpectedChar(char),
    #[error("unsupported pseudo-class `:{0}`")]
    UnsupportedPseudo(String),
    #[error("invalid nth-child expression `{0}`")]
    InvalidNth(String),
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
    #[error("unterminated string")]
    UnterminatedString,
}

/// Combinator between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a > b` - b is an immediate child of a
    Child,
    /// `a b` - b is any descendant of a
    Descendant,
}

/// A parsed selector: compound selectors left to right, with the
/// combinator joining compound `i` to compound `i + 1` at `combinators[i]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

/// One compound selector (`button.btn-primary[href$="x"]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    pub components: Vec<Component>,
}

/// A single selector component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// `*`
    Universal,
    /// Type selector (lowercase tag name)
    Type(String),
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `[attr]`, `[attr="v"]`, `[attr$="v"]`, ...
    Attribute(AttributeSelector),
    /// `:nth-child(An+B)`
    NthChild(NthExpr),
    /// `:root`
    Root,
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
}

/// Attribute match operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMatcher {
    /// `[attr=value]` - exact match
    Exact(String),
    /// `[attr~=value]` - whitespace-separated list contains
    Word(String),
    /// `[attr|=value]` - exact or prefix with hyphen
    DashMatch(String),
    /// `[attr^=value]` - starts with
    Prefix(String),
    /// `[attr$=value]` - ends with
    Suffix(String),
    /// `[attr*=value]` - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else { return false };
        match &self.matcher {
            None => true,
            Some(AttributeMatcher::Exact(expected)) => value == expected,
            Some(AttributeMatcher::Word(expected)) => {
                value.split_whitespace().any(|w| w == expected)
            }
            Some(AttributeMatcher::DashMatch(expected)) => {
                value == expected
                    || (value.starts_with(expected.as_str())
                        && value[expected.len()..].starts_with('-'))
            }
            Some(AttributeMatcher::Prefix(expected)) => value.starts_with(expected.as_str()),
            Some(AttributeMatcher::Suffix(expected)) => value.ends_with(expected.as_str()),
            Some(AttributeMatcher::Substring(expected)) => value.contains(expected.as_str()),
        }
    }
}

/// An+B expression for `:nth-child`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpr {
    /// Coefficient (A in An+B)
    pub step: i32,
    /// Offset (B in An+B)
    pub offset: i32,
}

impl NthExpr {
    /// Simple index (0n+b)
    pub fn index(b: i32) -> Self {
        Self { step: 0, offset: b }
    }

    /// Parse `odd`, `even`, a bare integer, or An+B
    pub fn parse(s: &str) -> Result<Self, SelectorError> {
        let trimmed = s.trim().to_ascii_lowercase();
        match trimmed.as_str() {
            "odd" => return Ok(Self { step: 2, offset: 1 }),
            "even" => return Ok(Self { step: 2, offset: 0 }),
            _ => {}
        }

        if let Ok(b) = trimmed.parse::<i32>() {
            return Ok(Self::index(b));
        }

        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        let invalid = || SelectorError::InvalidNth(s.trim().to_string());
        let n_pos = compact.find('n').ok_or_else(invalid)?;

        let step = match &compact[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            a => a.parse().map_err(|_| invalid())?,
        };
        let offset = match &compact[n_pos + 1..] {
            "" => 0,
            b => b.parse().map_err(|_| invalid())?,
        };
        Ok(Self { step, offset })
    }

    /// Check if 1-based index `n` matches this expression
    pub fn matches(&self, n: i32) -> bool {
        if self.step == 0 {
            return n == self.offset;
        }
        let diff = n - self.offset;
        if self.step > 0 {
            diff >= 0 && diff % self.step == 0
        } else {
            diff <= 0 && diff % self.step == 0
        }
    }
}

impl Selector {
    /// Parse a selector string
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut chars = input.chars().peekable();
        let mut compounds = Vec::new();
        let mut combinators = Vec::new();

        loop {
            let saw_ws = skip_whitespace(&mut chars);
            let Some(&c) = chars.peek() else { break };

            if !compounds.is_empty() {
                if c == '>' {
                    chars.next();
                    skip_whitespace(&mut chars);
                    combinators.push(Combinator::Child);
                } else if saw_ws {
                    combinators.push(Combinator::Descendant);
                } else {
                    return Err(SelectorError::UnexpectedChar(c));
                }
            }

            compounds.push(parse_compound(&mut chars)?);
        }

        if compounds.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self {
            compounds,
            combinators,
        })
    }

    /// Compound selectors, leftmost first
    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) -> bool {
    let mut saw = false;
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
        saw = true;
    }
    saw
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || (c as u32) >= 0x80
}

/// Decode one escape sequence; the leading backslash is already consumed
fn read_escape(chars: &mut Peekable<Chars<'_>>) -> Result<char, SelectorError> {
    let Some(&c) = chars.peek() else {
        return Err(SelectorError::UnexpectedChar('\\'));
    };
    if !c.is_ascii_hexdigit() {
        chars.next();
        return Ok(c);
    }

    let mut code = 0u32;
    let mut digits = 0;
    while digits < 6 {
        match chars.peek() {
            Some(&h) if h.is_ascii_hexdigit() => {
                code = code * 16 + h.to_digit(16).unwrap_or(0);
                chars.next();
                digits += 1;
            }
            _ => break,
        }
    }
    // one whitespace terminates the escape and is consumed with it
    if chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
    Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> Result<String, SelectorError> {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if c == '\\' {
            chars.next();
            out.push(read_escape(chars)?);
        } else if is_ident_char(c) {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
    Ok(out)
}

fn read_string(chars: &mut Peekable<Chars<'_>>, quote: char) -> Result<String, SelectorError> {
    let mut out = String::new();
    loop {
        match chars.next() {
            None => return Err(SelectorError::UnterminatedString),
            Some(c) if c == quote => return Ok(out),
            Some('\\') => out.push(read_escape(chars)?),
            Some(c) => out.push(c),
        }
    }
}

fn parse_compound(chars: &mut Peekable<Chars<'_>>) -> Result<Compound, SelectorError> {
    let mut components = Vec::new();

    while let Some(&c) = chars.peek() {
        match c {
            '*' => {
                chars.next();
                components.push(Component::Universal);
            }
            '#' => {
                chars.next();
                let id = read_ident(chars)?;
                if id.is_empty() {
                    return Err(SelectorError::UnexpectedChar('#'));
                }
                components.push(Component::Id(id));
            }
            '.' => {
                chars.next();
                let class = read_ident(chars)?;
                if class.is_empty() {
                    return Err(SelectorError::UnexpectedChar('.'));
                }
                components.push(Component::Class(class));
            }
            '[' => {
                chars.next();
                components.push(Component::Attribute(parse_attribute(chars)?));
            }
            ':' => {
                chars.next();
                components.push(parse_pseudo(chars)?);
            }
            c if c == '\\' || is_ident_char(c) => {
                let name = read_ident(chars)?;
                if name.is_empty() {
                    return Err(SelectorError::UnexpectedChar(c));
                }
                components.push(Component::Type(name.to_ascii_lowercase()));
            }
            _ => break,
        }
    }

    if components.is_empty() {
        match chars.peek() {
            Some(&c) => return Err(SelectorError::UnexpectedChar(c)),
            None => return Err(SelectorError::Empty),
        }
    }
    Ok(Compound { components })
}

fn parse_pseudo(chars: &mut Peekable<Chars<'_>>) -> Result<Component, SelectorError> {
    let name = read_ident(chars)?;
    match name.as_str() {
        "root" => Ok(Component::Root),
        "nth-child" => {
            if chars.next() != Some('(') {
                return Err(SelectorError::InvalidNth(String::new()));
            }
            let mut arg = String::new();
            loop {
                match chars.next() {
                    None => return Err(SelectorError::InvalidNth(arg)),
                    Some(')') => break,
                    Some(c) => arg.push(c),
                }
            }
            Ok(Component::NthChild(NthExpr::parse(&arg)?))
        }
        _ => Err(SelectorError::UnsupportedPseudo(name)),
    }
}

fn parse_attribute(chars: &mut Peekable<Chars<'_>>) -> Result<AttributeSelector, SelectorError> {
    skip_whitespace(chars);
    let name = read_ident(chars)?;
    if name.is_empty() {
        return Err(SelectorError::UnterminatedAttribute);
    }
    skip_whitespace(chars);

    let op = match chars.peek().copied() {
        Some(']') => {
            chars.next();
            return Ok(AttributeSelector {
                name,
                matcher: None,
            });
        }
        Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
            chars.next();
            if chars.next() != Some('=') {
                return Err(SelectorError::UnterminatedAttribute);
            }
            c
        }
        Some('=') => {
            chars.next();
            '='
        }
        _ => return Err(SelectorError::UnterminatedAttribute),
    };

    skip_whitespace(chars);
    let value = match chars.peek().copied() {
        Some(q @ ('"' | '\'')) => {
            chars.next();
            read_string(chars, q)?
        }
        _ => read_ident(chars)?,
    };
    skip_whitespace(chars);
    if chars.next() != Some(']') {
        return Err(SelectorError::UnterminatedAttribute);
    }

    let matcher = Some(match op {
        '=' => AttributeMatcher::Exact(value),
        '~' => AttributeMatcher::Word(value),
        '|' => AttributeMatcher::DashMatch(value),
        '^' => AttributeMatcher::Prefix(value),
        '$' => AttributeMatcher::Suffix(value),
        _ => AttributeMatcher::Substring(value),
    });
    Ok(AttributeSelector { name, matcher })
}

impl Document {
    /// Check if `element` matches `selector`
    pub fn matches(&self, element: NodeId, selector: &Selector) -> bool {
        if !self.is_element(element) {
            return false;
        }
        self.matches_from(element, selector, selector.compounds.len() - 1)
    }

    fn matches_from(&self, element: NodeId, selector: &Selector, idx: usize) -> bool {
        if !self.matches_compound(element, &selector.compounds[idx]) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match selector.combinators[idx - 1] {
            Combinator::Child => self
                .parent_element(element)
                .is_some_and(|p| self.matches_from(p, selector, idx - 1)),
            Combinator::Descendant => {
                let mut ancestor = self.parent_element(element);
                while let Some(a) = ancestor {
                    if self.matches_from(a, selector, idx - 1) {
                        return true;
                    }
                    ancestor = self.parent_element(a);
                }
                false
            }
        }
    }

    fn matches_compound(&self, element: NodeId, compound: &Compound) -> bool {
        compound
            .components
            .iter()
            .all(|c| self.matches_component(element, c))
    }

    fn matches_component(&self, element: NodeId, component: &Component) -> bool {
        match component {
            Component::Universal => true,
            Component::Type(tag) => self
                .tag_name(element)
                .is_some_and(|t| t.eq_ignore_ascii_case(tag)),
            Component::Id(id) => self.id_attr(element) == Some(id.as_str()),
            Component::Class(class) => self.classes(element).iter().any(|c| c == class),
            Component::Attribute(attr) => attr.matches(self.attribute(element, &attr.name)),
            Component::NthChild(expr) => self
                .sibling_index(element)
                .is_some_and(|i| expr.matches(i as i32)),
            Component::Root => self.parent_node(element).is_some_and(|p| {
                matches!(self.tree().get(p).map(|n| &n.data), Some(NodeData::Document))
            }),
        }
    }

    /// All elements under `root` (exclusive) matching `selector`, in
    /// document order. Never pierces shadow boundaries.
    pub fn query_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_matches(root, selector, &mut out);
        out
    }

    /// First element under `root` matching `selector`
    pub fn query_first(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_all(root, selector).into_iter().next()
    }

    fn collect_matches(&self, node: NodeId, selector: &Selector, out: &mut Vec<NodeId>) {
        for child in self.tree().children(node) {
            if self.is_element(child) {
                if self.matches(child, selector) {
                    out.push(child);
                }
                self.collect_matches(child, selector, out);
            }
        }
    }
}
