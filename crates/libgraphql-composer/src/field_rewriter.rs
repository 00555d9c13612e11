use crate::Arguments;
use crate::LexicalScanner;
use crate::LexicalState;
use crate::OperationKind;
use crate::lexical_scanner::is_name_continue;
use crate::lexical_scanner::whitespace_len;
use crate::value::format_arguments;
use indexmap::IndexMap;

/// Alias registrations keyed by the aliased field name. Only one alias per
/// field name is retained.
pub type AliasRegistry = IndexMap<String, AliasSpec>;

/// Directive registrations keyed by the annotated field name.
pub type DirectiveRegistry = IndexMap<String, DirectiveSpec>;

/// Requests that the first occurrence of `field` be rendered as
/// `alias: field(arguments)`.
#[derive(Clone, Debug, PartialEq)]
pub struct AliasSpec {
    pub(crate) alias: String,
    pub(crate) arguments: Arguments,
    pub(crate) field: String,
}
impl AliasSpec {
    pub fn new(
        alias: impl Into<String>,
        field: impl Into<String>,
        arguments: Arguments,
    ) -> Self {
        Self {
            alias: alias.into(),
            arguments,
            field: field.into(),
        }
    }

    pub fn alias(&self) -> &str {
        self.alias.as_str()
    }

    /// This returns an [`IndexMap`] so arguments render in the order they
    /// were given.
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn field(&self) -> &str {
        self.field.as_str()
    }
}

/// A single `@name(args)` annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveAnnotation {
    pub(crate) args: Arguments,
    pub(crate) name: String,
}
impl DirectiveAnnotation {
    pub fn new(name: impl Into<String>, args: Arguments) -> Self {
        Self {
            args,
            name: name.into(),
        }
    }

    pub fn args(&self) -> &Arguments {
        &self.args
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    fn to_graphql(&self) -> String {
        format!("@{}{}", self.name, format_arguments(&self.args))
    }
}

/// Every directive registered against one field, in registration order.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveSpec {
    pub(crate) directives: Vec<DirectiveAnnotation>,
    pub(crate) field: String,
}
impl DirectiveSpec {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            directives: vec![],
            field: field.into(),
        }
    }

    pub fn directives(&self) -> &[DirectiveAnnotation] {
        self.directives.as_slice()
    }

    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    pub(crate) fn push(&mut self, annot: DirectiveAnnotation) {
        self.directives.push(annot);
    }
}

/// A located occurrence of a field name in a document.
#[derive(Debug, PartialEq)]
struct FieldOccurrence {
    start: usize,
    /// End of the replaced range: just past the name, or just past an
    /// existing `(...)` argument list.
    end: usize,
}

/// Rewrite the first occurrence of each aliased or annotated field.
///
/// Fields are processed in alias-registration order followed by any fields
/// that only carry directives. For each field the first code-state
/// occurrence of its name (plus an adjacent argument list, if any) is
/// replaced with `[alias: ]field[(args)][ @directive(args) ...]`, built
/// from the registries alone; an argument list already present on the
/// occurrence is dropped. Later occurrences of the same name are left
/// untouched.
pub fn apply_aliases_and_directives(
    document: &str,
    aliases: &AliasRegistry,
    directives: &DirectiveRegistry,
) -> String {
    let field_names = aliases.keys()
        .chain(directives.keys().filter(|field| !aliases.contains_key(*field)));

    let mut rewritten = document.to_string();
    for field in field_names {
        let Some(occurrence) = find_field_occurrence(&rewritten, field) else {
            tracing::debug!(%field, "no rewritable occurrence of field found");
            continue;
        };

        let token = build_field_token(field, aliases.get(field), directives.get(field));
        tracing::trace!(%field, %token, "rewriting field occurrence");

        let mut next = String::with_capacity(rewritten.len() + token.len());
        next.push_str(&rewritten[..occurrence.start]);
        next.push_str(&token);
        next.push_str(&rewritten[occurrence.end..]);
        rewritten = next;
    }
    rewritten
}

fn build_field_token(
    field: &str,
    alias: Option<&AliasSpec>,
    directives: Option<&DirectiveSpec>,
) -> String {
    let mut token = String::new();
    if let Some(alias) = alias {
        token.push_str(&alias.alias);
        token.push_str(": ");
    }
    token.push_str(field);
    if let Some(alias) = alias {
        token.push_str(&format_arguments(&alias.arguments));
    }

    if let Some(directives) = directives {
        for annot in &directives.directives {
            token.push(' ');
            token.push_str(&annot.to_graphql());
        }
    }
    token
}

/// Locate the first occurrence of `field` that starts in code, is delimited
/// as a whole name, and is neither a variable reference (`$field`), a spread
/// (`...field`), a directive name (`@field`), an alias/argument name
/// (`field:`), nor the name of an operation or fragment definition.
fn find_field_occurrence(document: &str, field: &str) -> Option<FieldOccurrence> {
    if field.is_empty() {
        return None;
    }

    LexicalScanner::code_matches(document, field).find_map(|start| {
        let preceded_by_name_char = document[..start]
            .chars()
            .next_back()
            .is_some_and(|ch| is_name_continue(ch) || matches!(ch, '$' | '.' | '@'));
        if preceded_by_name_char || is_definition_name(document, start) {
            return None;
        }

        let name_end = start + field.len();
        let after_name = &document[name_end..];
        if after_name.chars().next().is_some_and(is_name_continue) {
            return None;
        }

        let gap = whitespace_len(after_name);
        let after_gap = &after_name[gap..];
        if after_gap.starts_with(':') {
            return None;
        }

        let occurrence = if after_gap.starts_with('(') {
            let args_start = name_end + gap;
            match find_closing_paren(document, args_start) {
                Some(args_end) => FieldOccurrence { start, end: args_end },
                None => FieldOccurrence { start, end: name_end },
            }
        } else {
            FieldOccurrence { start, end: name_end }
        };
        Some(occurrence)
    })
}

/// Given the offset of a code-state `(`, return the offset just past its
/// matching `)`, skipping parentheses inside strings and comments.
fn find_closing_paren(document: &str, open_offset: usize) -> Option<usize> {
    let mut depth = 0usize;
    for classified in LexicalScanner::resume_in_code(document, open_offset) {
        if classified.state != LexicalState::Code {
            continue;
        }
        match classified.ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(classified.offset + 1);
                }
            },
            _ => (),
        }
    }
    None
}

/// Whether the name starting at `start` directly follows a top-level
/// `query`/`mutation`/`subscription`/`fragment` keyword, making it the name
/// of that definition rather than a field.
fn is_definition_name(document: &str, start: usize) -> bool {
    let before = document[..start].trim_end();
    if before.len() == start {
        return false;
    }

    let keyword_start = before.char_indices()
        .rev()
        .take_while(|(_, ch)| is_name_continue(*ch))
        .last()
        .map(|(idx, _)| idx);
    let Some(keyword_start) = keyword_start else {
        return false;
    };

    let keyword = &before[keyword_start..];
    let is_definition_keyword = keyword == "fragment"
        || OperationKind::ALL.iter().any(|kind| kind.keyword() == keyword);
    if !is_definition_keyword {
        return false;
    }

    let preceded_by_name_char = before[..keyword_start]
        .chars()
        .next_back()
        .is_some_and(is_name_continue);
    !preceded_by_name_char && brace_depth_in_code(document, keyword_start) == Some(0)
}

/// Depth of `{` nesting at `offset`, or `None` if `offset` does not lie in
/// code.
fn brace_depth_in_code(document: &str, offset: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut scanner = LexicalScanner::new(document);
    while scanner.offset() < offset {
        let Some(classified) = scanner.consume() else {
            break;
        };
        if classified.state != LexicalState::Code {
            continue;
        }
        match classified.ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => (),
        }
    }
    (scanner.state() == LexicalState::Code).then_some(depth)
}
