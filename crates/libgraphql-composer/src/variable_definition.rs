use crate::LexicalScanner;
use crate::LexicalState;
use crate::OperationKind;
use crate::Value;
use crate::lexical_scanner::ignored_len;
use crate::lexical_scanner::is_name_continue;
use crate::lexical_scanner::name_len;
use indexmap::IndexMap;

/// Variable definitions keyed by variable name, in registration order.
pub type VariableDefinitions = IndexMap<String, VariableDefinition>;

/// A declared operation variable: `$name: Type[ = default]`.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    pub(crate) default_value: Option<Value>,
    pub(crate) name: String,
    pub(crate) type_annotation: String,
}
impl VariableDefinition {
    /// A leading `$` on `name` is dropped; it is re-added when rendered.
    pub fn new(
        name: impl AsRef<str>,
        type_annotation: impl Into<String>,
        default_value: Option<Value>,
    ) -> Self {
        let name = name.as_ref();
        Self {
            default_value,
            name: name.strip_prefix('$').unwrap_or(name).to_string(),
            type_annotation: type_annotation.into(),
        }
    }

    /// `Some(Value::Null)` is an explicit `= null` default and is distinct
    /// from `None` (no default).
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn type_annotation(&self) -> &str {
        self.type_annotation.as_str()
    }

    pub fn to_graphql(&self) -> String {
        match &self.default_value {
            Some(default_value) => format!(
                "${}: {} = {}",
                self.name,
                self.type_annotation,
                default_value.to_default_value_string(),
            ),
            None => format!("${}: {}", self.name, self.type_annotation),
        }
    }
}

/// Render `($a: A, $b: B = 1)` in registration order, or an empty string
/// when nothing is registered.
pub fn format_variable_definitions(definitions: &VariableDefinitions) -> String {
    if definitions.is_empty() {
        return String::new();
    }

    let rendered = definitions.values()
        .map(VariableDefinition::to_graphql)
        .collect::<Vec<_>>()
        .join(", ");
    format!("({rendered})")
}

/// Where the definitions list belongs in a document.
#[derive(Debug, PartialEq)]
enum InsertionPoint {
    /// Directly after an operation keyword and its optional name.
    AfterOperationHeader(usize),

    /// The operation already declares `(...)`; leave it alone.
    AlreadyDeclared,

    /// No operation header was found.
    None,

    /// The document is a `{ ... }` shorthand query starting at this offset.
    ShorthandQuery(usize),
}

/// Insert the registered definitions after the first operation keyword (and
/// its optional name) of `document`.
///
/// Documents whose first operation already carries a `(...)` definitions
/// list are returned unmodified; existing declarations are never merged
/// with registered ones. A `{ ... }` shorthand query is promoted to
/// `query(...) { ... }`.
pub fn inject_variable_definitions(
    document: &str,
    definitions: &VariableDefinitions,
) -> String {
    if definitions.is_empty() {
        return document.to_string();
    }

    let rendered = format_variable_definitions(definitions);
    match find_insertion_point(document) {
        InsertionPoint::AfterOperationHeader(offset) => {
            let mut injected = String::with_capacity(document.len() + rendered.len());
            injected.push_str(&document[..offset]);
            injected.push_str(&rendered);
            injected.push_str(&document[offset..]);
            injected
        },

        InsertionPoint::ShorthandQuery(offset) => {
            format!(
                "{}{}{rendered} {}",
                &document[..offset],
                OperationKind::Query.keyword(),
                &document[offset..],
            )
        },

        InsertionPoint::AlreadyDeclared => {
            tracing::debug!(
                "operation already declares variables; leaving definitions \
                untouched",
            );
            document.to_string()
        },

        InsertionPoint::None => {
            tracing::debug!(
                "no operation found to attach variable definitions to",
            );
            document.to_string()
        },
    }
}

/// Find the first operation keyword that appears in code at brace depth 0.
fn find_insertion_point(document: &str) -> InsertionPoint {
    let mut brace_depth = 0usize;
    let mut prev_code_char: Option<char> = None;
    let mut seen_code_token = false;

    for classified in LexicalScanner::new(document) {
        if classified.state != LexicalState::Code
            || classified.ch == '#'
            || classified.ch.is_whitespace() {
            prev_code_char = None;
            continue;
        }

        match classified.ch {
            '{' if brace_depth == 0 && !seen_code_token =>
                return InsertionPoint::ShorthandQuery(classified.offset),
            '{' => brace_depth += 1,
            '}' => brace_depth = brace_depth.saturating_sub(1),
            _ if brace_depth == 0 && !prev_code_char.is_some_and(is_name_continue) => {
                let rest = &document[classified.offset..];
                let keyword_len = name_len(rest);
                let is_operation_keyword = OperationKind::ALL.iter()
                    .any(|kind| kind.keyword() == &rest[..keyword_len]);
                if keyword_len > 0 && is_operation_keyword {
                    return header_insertion_point(
                        document,
                        classified.offset + keyword_len,
                    );
                }
            },
            _ => (),
        }

        seen_code_token = true;
        prev_code_char = Some(classified.ch);
    }

    InsertionPoint::None
}

/// Skip the optional operation name following a keyword that ends at
/// `keyword_end`, then decide whether definitions are already declared.
/// Comments may sit anywhere whitespace can.
fn header_insertion_point(document: &str, keyword_end: usize) -> InsertionPoint {
    let after_keyword = &document[keyword_end..];
    let name_start = ignored_len(after_keyword);
    let operation_name_len = name_len(&after_keyword[name_start..]);

    let header_end = if operation_name_len > 0 {
        keyword_end + name_start + operation_name_len
    } else {
        keyword_end
    };

    let after_header = &document[header_end..];
    if after_header[ignored_len(after_header)..].starts_with('(') {
        InsertionPoint::AlreadyDeclared
    } else {
        InsertionPoint::AfterOperationHeader(header_end)
    }
}
