//! Parsing and indexed representation of the state hierarchy.

pub mod model;
pub mod syntax;

pub use model::Tree;
pub use syntax::{NodeKind, SyntaxNode, SyntaxTree};
