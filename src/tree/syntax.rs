//! Parses an indented ASCII-art tree description into a [`SyntaxTree`].
//!
//! ```text
//! Root
//! |-- A
//! |   |-- B
//! |-- [C]
//! ```

use std::collections::HashSet;

use crate::error::ParseError;

/// Whether a parsed node is an ordinary state or an orthogonal region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    State,
    Region,
}

/// A single node of the unindexed parse tree.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub name: String,
    pub kind: NodeKind,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn is_region(&self) -> bool {
        self.kind == NodeKind::Region
    }
}

/// The unindexed, name-addressed tree produced by [`parse`].
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub root: SyntaxNode,
}

/// Parses a complete ASCII-art tree description.
pub fn parse(input: &str) -> Result<SyntaxTree, ParseError> {
    let lines: Vec<(usize, &str)> = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end()))
        .filter(|(_, l)| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        lines,
        pos: 0,
        seen: HashSet::new(),
    };

    let (root_lineno, root_text) = parser.lines[0];
    let root_chars: Vec<char> = root_text.chars().collect();
    let (name, kind) = parser.parse_ident(&root_chars, 0, root_lineno)?;
    parser.seen.insert(name.clone());
    parser.pos = 1;
    let children = parser.parse_children(0)?;

    Ok(SyntaxTree {
        root: SyntaxNode { name, kind, children },
    })
}

struct Parser<'a> {
    lines: Vec<(usize, &'a str)>,
    pos: usize,
    seen: HashSet<String>,
}

impl<'a> Parser<'a> {
    fn parse_children(&mut self, parent_col: usize) -> Result<Vec<SyntaxNode>, ParseError> {
        let mut children = Vec::new();

        while self.pos < self.lines.len() {
            let (lineno, text) = self.lines[self.pos];
            let chars: Vec<char> = text.chars().collect();

            if parent_col >= chars.len() || chars[parent_col] != '|' {
                break;
            }

            if parent_col + 1 < chars.len() && chars[parent_col + 1] == '-' {
                let mut col = parent_col + 1;
                while col < chars.len() && chars[col] == '-' {
                    col += 1;
                }
                while col < chars.len() && (chars[col] == ' ' || chars[col] == '\t') {
                    col += 1;
                }

                let (name, kind) = self.parse_ident(&chars, col, lineno)?;
                if !self.seen.insert(name.clone()) {
                    return Err(ParseError::DuplicateName { line: lineno, name });
                }

                self.pos += 1;
                let grandchildren = self.parse_children(col)?;
                children.push(SyntaxNode { name, kind, children: grandchildren });
            } else {
                // vertical pass-through for a deeper ancestor; not a child of this node.
                self.pos += 1;
            }
        }

        Ok(children)
    }

    fn parse_ident(&self, chars: &[char], col: usize, lineno: usize) -> Result<(String, NodeKind), ParseError> {
        if col >= chars.len() {
            return Err(ParseError::EmptyIdentifier { line: lineno });
        }

        if chars[col] == '[' {
            let close = chars[col..]
                .iter()
                .position(|&c| c == ']')
                .map(|p| p + col)
                .ok_or(ParseError::BadRegionMarker { line: lineno })?;
            let ident: String = chars[col + 1..close].iter().collect();
            validate_ident(&ident, lineno)?;
            Ok((ident, NodeKind::Region))
        } else {
            let end = chars[col..]
                .iter()
                .position(|c| !c.is_ascii_alphanumeric())
                .map(|p| p + col)
                .unwrap_or(chars.len());
            let ident: String = chars[col..end].iter().collect();
            validate_ident(&ident, lineno)?;
            Ok((ident, NodeKind::State))
        }
    }
}

fn validate_ident(ident: &str, lineno: usize) -> Result<(), ParseError> {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Err(ParseError::EmptyIdentifier { line: lineno }),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric()) {
        return Err(ParseError::EmptyIdentifier { line: lineno });
    }
    Ok(())
}
