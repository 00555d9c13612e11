use crate::LexicalScanner;
use crate::QueryComposeError;
use crate::lexical_scanner::is_name_continue;
use indexmap::IndexMap;

type Result<T> = std::result::Result<T, QueryComposeError>;

/// Upper bound on whole-document substitution passes performed by
/// [`resolve_fragments`].
pub const MAX_FRAGMENT_RESOLUTION_PASSES: usize = 10;

/// Named fragment bodies, kept in registration order.
///
/// A body is raw GraphQL selection text and may itself contain spreads of
/// other fragments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FragmentRegistry {
    fragments: IndexMap<String, String>,
}

impl FragmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `body` under `name`.
    ///
    /// Re-registering an existing name replaces its body but keeps its
    /// original position in the resolution order.
    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.fragments.insert(name.into(), body.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fragments.get(name).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Iterate `(name, body)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fragments.iter().map(|(name, body)| (name.as_str(), body.as_str()))
    }
}

/// Replace every `...Name` spread that appears in code with the registered
/// body of `Name`, repeating whole-document passes until a pass makes no
/// replacements.
///
/// Spreads inside string literals or comments are left verbatim. Spreads of
/// unregistered names are left in place. If the
/// [`MAX_FRAGMENT_RESOLUTION_PASSES`]th pass still replaced something, the
/// fragment graph is treated as cyclic (or runaway) and
/// [`QueryComposeError::CircularOrExcessiveExpansion`] is returned.
pub fn resolve_fragments(
    document: &str,
    fragments: &FragmentRegistry,
) -> Result<String> {
    let mut resolved = document.to_string();
    if fragments.is_empty() {
        return Ok(resolved);
    }

    for pass in 1..=MAX_FRAGMENT_RESOLUTION_PASSES {
        let mut pass_replacements = 0;
        for (name, body) in fragments.iter() {
            if let Some((next, replacements)) = replace_spreads(&resolved, name, body) {
                resolved = next;
                pass_replacements += replacements;
            }
        }

        tracing::trace!(pass, pass_replacements, "fragment resolution pass");
        if pass_replacements == 0 {
            return Ok(resolved);
        }
    }

    let unresolved = fragments.iter()
        .filter(|(name, _)| {
            !name.is_empty() && first_spread_offset(&resolved, name).is_some()
        })
        .map(|(name, _)| name.to_string())
        .collect::<Vec<_>>();

    Err(QueryComposeError::CircularOrExcessiveExpansion {
        passes: MAX_FRAGMENT_RESOLUTION_PASSES,
        unresolved,
    })
}

/// Replace each non-overlapping code-state `...name` spread in `document`,
/// left to right, with `body`.
///
/// Returns `None` when nothing was replaced.
fn replace_spreads(document: &str, name: &str, body: &str) -> Option<(String, usize)> {
    if name.is_empty() {
        return None;
    }

    let spread = format!("...{name}");
    let mut output = String::with_capacity(document.len());
    let mut copied_up_to = 0;
    let mut replacements = 0;

    for offset in spread_offsets(document, &spread) {
        if offset < copied_up_to {
            continue;
        }
        output.push_str(&document[copied_up_to..offset]);
        output.push_str(body);
        copied_up_to = offset + spread.len();
        replacements += 1;
    }

    if replacements == 0 {
        return None;
    }

    output.push_str(&document[copied_up_to..]);
    Some((output, replacements))
}

fn first_spread_offset(document: &str, name: &str) -> Option<usize> {
    let spread = format!("...{name}");
    spread_offsets(document, &spread).next()
}

/// Offsets of `spread` in code state that are followed by a word boundary.
fn spread_offsets<'a>(
    document: &'a str,
    spread: &'a str,
) -> impl Iterator<Item = usize> + 'a {
    LexicalScanner::code_matches(document, spread).filter(move |&offset| {
        !document[offset + spread.len()..]
            .chars()
            .next()
            .is_some_and(is_name_continue)
    })
}
