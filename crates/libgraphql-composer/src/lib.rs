//! Assemble executable GraphQL documents from reusable pieces: raw query
//! text, named fragments, variable definitions, field aliases, and
//! directives, or a selection tree built through a fluent API.
//!
//! No GraphQL grammar is parsed. Every transformation is a text pass that
//! consults a [`LexicalScanner`] so that only structural code is rewritten;
//! anything inside a string literal or a `#` comment is left byte-for-byte
//! intact.
//!
//! [`QueryComposer::build`] runs the passes in a fixed order:
//!
//! 1. the fluent [`Operation`] (if any) is serialized, otherwise the loaded
//!    raw document is used;
//! 2. [`resolve_fragments`] splices registered fragment bodies in place of
//!    `...Name` spreads until a fixed point is reached;
//! 3. [`apply_aliases_and_directives`] rewrites the first occurrence of each
//!    aliased/annotated field;
//! 4. [`inject_variable_definitions`] inserts the `($name: Type, ...)` list
//!    after the operation header.

mod composed_query;
mod field_rewriter;
pub mod file_reader;
mod fragment_resolver;
mod lexical_scanner;
mod query_compose_error;
mod query_composer;
mod selection_tree;
mod value;
mod variable_definition;

pub use composed_query::ComposedQuery;
pub use composed_query::VariablesMap;
pub use field_rewriter::AliasRegistry;
pub use field_rewriter::AliasSpec;
pub use field_rewriter::DirectiveAnnotation;
pub use field_rewriter::DirectiveRegistry;
pub use field_rewriter::DirectiveSpec;
pub use field_rewriter::apply_aliases_and_directives;
pub use fragment_resolver::FragmentRegistry;
pub use fragment_resolver::MAX_FRAGMENT_RESOLUTION_PASSES;
pub use fragment_resolver::resolve_fragments;
pub use lexical_scanner::ClassifiedChar;
pub use lexical_scanner::LexicalScanner;
pub use lexical_scanner::LexicalState;
pub use query_compose_error::QueryComposeError;
pub use query_compose_error::SourceKind;
pub use query_composer::QueryComposer;
pub use selection_tree::Operation;
pub use selection_tree::OperationKind;
pub use selection_tree::SelectionNode;
pub use selection_tree::SelectionNodeId;
pub use selection_tree::SelectionTree;
pub use value::Arguments;
pub use value::Value;
pub use value::collect_arguments;
pub use value::format_arguments;
pub use variable_definition::VariableDefinition;
pub use variable_definition::VariableDefinitions;
pub use variable_definition::format_variable_definitions;
pub use variable_definition::inject_variable_definitions;

#[cfg(test)]
mod tests;
