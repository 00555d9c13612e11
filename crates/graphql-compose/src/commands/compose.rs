use anyhow::Context;
use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use libgraphql_composer::QueryComposer;
use libgraphql_composer::Value;
use libgraphql_composer::VariableDefinition;
use libgraphql_composer::VariablesMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Debug, clap::Args)]
#[command(group(
    clap::ArgGroup::new("document")
        .args(["query_file", "query"])
        .required(true),
))]
pub(crate) struct ComposeCmd {
    #[arg(
        help="Alias the first occurrence of FIELD as `ALIAS: FIELD`.",
        long="alias",
        value_name="ALIAS=FIELD",
        value_parser=parse_name_value,
    )]
    aliases: Vec<(String, String)>,

    #[arg(
        help="Declare an operation variable. The optional default is parsed \
             as JSON.",
        long="define-variable",
        value_name="NAME:TYPE[=JSON_DEFAULT]",
        value_parser=parse_variable_definition,
    )]
    variable_definitions: Vec<VariableDefinition>,

    #[arg(
        help="Append `@NAME` to the first occurrence of FIELD.",
        long="directive",
        value_name="FIELD=NAME",
        value_parser=parse_name_value,
    )]
    directives: Vec<(String, String)>,

    #[arg(
        help="Register an inline fragment body.",
        long="fragment",
        value_name="NAME=BODY",
        value_parser=parse_name_value,
    )]
    fragments: Vec<(String, String)>,

    #[arg(
        help="Register every fragment file found under a directory, named \
             after each file's stem. Explicit --fragment-file and --fragment \
             registrations take precedence.",
        long="fragment-dir",
        value_name="DIR",
    )]
    fragment_dirs: Vec<PathBuf>,

    #[arg(
        default_values_t=[
            "graphql".to_string(),
            "gql".to_string(),
        ],
        help="Set of file extensions to filter to when searching for \
             fragment files within a --fragment-dir.",
        long,
        value_delimiter=',',
    )]
    fragment_file_exts: Vec<String>,

    #[arg(
        help="Register the trimmed contents of a file as a fragment body.",
        long="fragment-file",
        value_name="NAME=PATH",
        value_parser=parse_name_path,
    )]
    fragment_files: Vec<(String, PathBuf)>,

    #[arg(help="Inline GraphQL document to compose.", long)]
    query: Option<String>,

    #[arg(help="Path to the GraphQL document to compose.", long)]
    query_file: Option<PathBuf>,

    #[arg(
        help="Print only the composed query text instead of the JSON \
             `{\"query\", \"variables\"}` object.",
        long,
    )]
    query_only: bool,

    #[arg(
        help="JSON object of variable values passed through to the output.",
        long,
        value_name="JSON",
        value_parser=parse_variables,
    )]
    variables: Option<VariablesMap>,
}

impl ComposeCmd {
    pub(crate) fn compose(&self) -> anyhow::Result<String> {
        let mut composer = QueryComposer::new();

        let mut canonical_query_file = None;
        if let Some(query_file) = &self.query_file {
            composer.load_from_file(query_file)?;
            canonical_query_file = Some(canonicalize(query_file));
        } else if let Some(query) = &self.query {
            composer.load_from_str(query);
        }

        let fragment_file_exts: HashSet<&str> =
            self.fragment_file_exts.iter()
                .map(|ext| ext.trim_start_matches('.'))
                .collect();
        for dir in &self.fragment_dirs {
            for (name, path) in find_fragment_files(dir, &fragment_file_exts)? {
                if canonical_query_file.as_ref() == Some(&canonicalize(&path)) {
                    log::debug!("Skipping query file {path:#?} in fragment dir.");
                    continue;
                }
                log::debug!("Registering fragment `{name}` from {path:#?}.");
                composer.load_fragment_from_file(name, path)?;
            }
        }
        for (name, path) in &self.fragment_files {
            composer.load_fragment_from_file(name.as_str(), path)?;
        }
        for (name, body) in &self.fragments {
            composer.add_fragment(name.as_str(), body.as_str());
        }

        for (alias, field) in &self.aliases {
            composer.add_alias(alias.as_str(), field.as_str());
        }
        for (field, directive) in &self.directives {
            composer.add_directive(field.as_str(), directive.as_str());
        }
        for definition in &self.variable_definitions {
            composer.add_variable_definition(definition.clone());
        }
        if let Some(variables) = &self.variables {
            composer.with_variables(variables.clone());
        }

        let composed = composer.build()?;
        if self.query_only {
            Ok(composed.query)
        } else {
            Ok(serde_json::to_string_pretty(&composed)?)
        }
    }
}

#[inherent::inherent]
impl RunnableCommand for ComposeCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        match self.compose() {
            Ok(output) => CommandResult::stdout(format_args!("{output}")),
            Err(e) => CommandResult::stderr(format_args!(
                "{} {e:#}",
                output_utils::RED_X,
            )),
        }
    }
}

/// Every file at or under `dir` whose extension is in `exts`, paired with
/// its file stem, sorted by path.
fn find_fragment_files(
    dir: &Path,
    exts: &HashSet<&str>,
) -> anyhow::Result<Vec<(String, PathBuf)>> {
    let mut fragment_files = vec![];
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!(
            "Failed to scan fragment directory {}",
            dir.display(),
        ))?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            log::trace!("Skipping non-file: {path:#?}.");
            continue;
        }

        let has_fragment_ext = path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| exts.contains(ext));
        let stem = path.file_stem().and_then(|stem| stem.to_str());
        match stem {
            Some(stem) if has_fragment_ext =>
                fragment_files.push((stem.to_string(), path.to_path_buf())),
            _ => log::trace!("Skipping non-fragment file: {path:#?}."),
        }
    }
    Ok(fragment_files)
}

/// Falls back to `path` itself when it cannot be resolved.
fn canonicalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn parse_name_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() =>
            Ok((name.trim().to_string(), value.to_string())),
        _ => Err(format!("expected `NAME=VALUE`, got `{arg}`")),
    }
}

fn parse_name_path(arg: &str) -> Result<(String, PathBuf), String> {
    parse_name_value(arg).map(|(name, path)| (name, PathBuf::from(path)))
}

fn parse_variable_definition(arg: &str) -> Result<VariableDefinition, String> {
    let (declaration, default_value) = match arg.split_once('=') {
        Some((declaration, default_json)) => {
            let json: serde_json::Value = serde_json::from_str(default_json)
                .map_err(|e| format!("invalid JSON default `{default_json}`: {e}"))?;
            (declaration, Some(Value::from(json)))
        },
        None => (arg, None),
    };

    match declaration.split_once(':') {
        Some((name, type_annotation))
            if !name.trim().is_empty() && !type_annotation.trim().is_empty() =>
            Ok(VariableDefinition::new(
                name.trim(),
                type_annotation.trim(),
                default_value,
            )),
        _ => Err(format!("expected `NAME:TYPE[=JSON_DEFAULT]`, got `{arg}`")),
    }
}

fn parse_variables(arg: &str) -> Result<VariablesMap, String> {
    serde_json::from_str(arg)
        .map_err(|e| format!("expected a JSON object of variables: {e}"))
}
