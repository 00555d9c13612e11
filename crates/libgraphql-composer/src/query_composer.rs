use crate::AliasRegistry;
use crate::AliasSpec;
use crate::Arguments;
use crate::ComposedQuery;
use crate::DirectiveAnnotation;
use crate::DirectiveRegistry;
use crate::DirectiveSpec;
use crate::FragmentRegistry;
use crate::Operation;
use crate::OperationKind;
use crate::QueryComposeError;
use crate::SourceKind;
use crate::Value;
use crate::VariableDefinition;
use crate::VariableDefinitions;
use crate::VariablesMap;
use crate::field_rewriter::apply_aliases_and_directives;
use crate::file_reader;
use crate::fragment_resolver::resolve_fragments;
use crate::value::collect_arguments;
use crate::variable_definition::inject_variable_definitions;
use std::path::Path;

type Result<T> = std::result::Result<T, QueryComposeError>;

/// A single composition session: the current document (raw text or a
/// fluently built operation) plus the fragment, alias, directive, and
/// variable-definition registries that [`QueryComposer::build`] applies to
/// it.
///
/// Every registration method returns `&mut Self` so calls chain. Fallible
/// ones return `Result<&mut Self>`.
///
/// # Example
///
/// ```
/// use libgraphql_composer::QueryComposer;
/// use libgraphql_composer::Value;
///
/// # fn example() -> Result<(), libgraphql_composer::QueryComposeError> {
/// let composed = QueryComposer::new()
///     .load_from_str("query { user { ...UserFields } }")
///     .add_fragment("UserFields", "id name")
///     .define_variable("id", "ID!")
///     .build()?;
///
/// assert_eq!(composed.query, "query($id: ID!) { user { id name } }");
///
/// let composed = QueryComposer::new()
///     .query(Some("GetUser"))
///     .object_with("user", [("id", Value::from("$id"))], None)
///         .field("name")
///     .end()?
///     .build()?;
///
/// assert_eq!(
///     composed.query,
///     "query GetUser {\n  user(id: $id) {\n    name\n  }\n}",
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryComposer {
    aliases: AliasRegistry,
    directives: DirectiveRegistry,
    document: String,
    fragments: FragmentRegistry,
    operation: Option<Operation>,
    variable_definitions: VariableDefinitions,
    variables: VariablesMap,
}

impl QueryComposer {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Raw documents
    // =========================================================================

    /// Use `content` (trimmed) as the document, replacing any previously
    /// loaded text or fluent operation.
    pub fn load_from_str(&mut self, content: impl AsRef<str>) -> &mut Self {
        self.document = content.as_ref().trim().to_string();
        self.operation = None;
        self
    }

    /// Use the trimmed contents of the file at `file_path` as the document.
    pub fn load_from_file(&mut self, file_path: impl AsRef<Path>) -> Result<&mut Self> {
        let file_path = file_path.as_ref();
        let content = file_reader::read_content(file_path)
            .map_err(|e| QueryComposeError::from_read_error(SourceKind::Query, e))?;
        tracing::debug!(?file_path, "loaded query document from file");
        Ok(self.load_from_str(content))
    }

    /// The current raw document text. Empty when nothing has been loaded or
    /// after a fluent operation was started.
    pub fn document(&self) -> &str {
        self.document.as_str()
    }

    // =========================================================================
    // Variables
    // =========================================================================

    /// Merge `variables` into the variables map. Existing names are
    /// overwritten in place; new names are appended.
    pub fn with_variables<K: Into<String>>(
        &mut self,
        variables: impl IntoIterator<Item = (K, serde_json::Value)>,
    ) -> &mut Self {
        for (name, value) in variables {
            self.variables.insert(name.into(), value);
        }
        self
    }

    pub fn variables(&self) -> &VariablesMap {
        &self.variables
    }

    /// Declare `$name: type_annotation` with no default value.
    pub fn define_variable(
        &mut self,
        name: impl AsRef<str>,
        type_annotation: impl Into<String>,
    ) -> &mut Self {
        self.add_variable_definition(VariableDefinition::new(name, type_annotation, None))
    }

    /// Declare `$name: type_annotation = default_value`.
    pub fn define_variable_with_default(
        &mut self,
        name: impl AsRef<str>,
        type_annotation: impl Into<String>,
        default_value: impl Into<Value>,
    ) -> &mut Self {
        self.add_variable_definition(VariableDefinition::new(
            name,
            type_annotation,
            Some(default_value.into()),
        ))
    }

    /// Add a [`VariableDefinition`] after any previously added ones.
    /// Redefining a name replaces it in its original position.
    pub fn add_variable_definition(&mut self, definition: VariableDefinition) -> &mut Self {
        self.variable_definitions.insert(definition.name().to_string(), definition);
        self
    }

    pub fn variable_definitions(&self) -> &VariableDefinitions {
        &self.variable_definitions
    }

    // =========================================================================
    // Fragments
    // =========================================================================

    /// Register `body` to be spliced in wherever `...name` appears in code.
    pub fn add_fragment(
        &mut self,
        name: impl Into<String>,
        body: impl Into<String>,
    ) -> &mut Self {
        self.fragments.insert(name, body);
        self
    }

    /// Register the trimmed contents of the file at `file_path` as the body
    /// of fragment `name`.
    pub fn load_fragment_from_file(
        &mut self,
        name: impl Into<String>,
        file_path: impl AsRef<Path>,
    ) -> Result<&mut Self> {
        let name = name.into();
        let file_path = file_path.as_ref();
        let content = file_reader::read_content(file_path)
            .map_err(|e| QueryComposeError::from_read_error(
                SourceKind::Fragment(name.clone()),
                e,
            ))?;
        tracing::debug!(fragment = %name, ?file_path, "loaded fragment from file");
        Ok(self.add_fragment(name, content.trim()))
    }

    pub fn fragments(&self) -> &FragmentRegistry {
        &self.fragments
    }

    // =========================================================================
    // Aliases and directives
    // =========================================================================

    /// Render the first occurrence of `field` as `alias: field`.
    pub fn add_alias(
        &mut self,
        alias: impl Into<String>,
        field: impl Into<String>,
    ) -> &mut Self {
        self.add_alias_spec(AliasSpec::new(alias, field, Arguments::new()))
    }

    /// Render the first occurrence of `field` as `alias: field(arguments)`.
    pub fn add_alias_with_arguments<K, V>(
        &mut self,
        alias: impl Into<String>,
        field: impl Into<String>,
        arguments: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.add_alias_spec(AliasSpec::new(alias, field, collect_arguments(arguments)))
    }

    /// Only one alias per field name is retained; a later registration
    /// replaces an earlier one.
    pub fn add_alias_spec(&mut self, spec: AliasSpec) -> &mut Self {
        self.aliases.insert(spec.field().to_string(), spec);
        self
    }

    /// Append `@directive` to the first occurrence of `field`.
    pub fn add_directive(
        &mut self,
        field: impl Into<String>,
        directive: impl Into<String>,
    ) -> &mut Self {
        self.add_directive_annotation(field, DirectiveAnnotation::new(directive, Arguments::new()))
    }

    /// Append `@directive(arguments)` to the first occurrence of `field`.
    pub fn add_directive_with_arguments<K, V>(
        &mut self,
        field: impl Into<String>,
        directive: impl Into<String>,
        arguments: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.add_directive_annotation(
            field,
            DirectiveAnnotation::new(directive, collect_arguments(arguments)),
        )
    }

    /// Add a [`DirectiveAnnotation`] after any previously added annotations
    /// on the same field.
    pub fn add_directive_annotation(
        &mut self,
        field: impl Into<String>,
        annot: DirectiveAnnotation,
    ) -> &mut Self {
        let field = field.into();
        self.directives
            .entry(field.clone())
            .or_insert_with(|| DirectiveSpec::new(field))
            .push(annot);
        self
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    pub fn directives(&self) -> &DirectiveRegistry {
        &self.directives
    }

    // =========================================================================
    // Fluent operations
    // =========================================================================

    /// Start a fluent `query`, discarding any previously loaded document or
    /// fluent operation.
    pub fn query(&mut self, name: Option<&str>) -> &mut Self {
        self.start_operation(OperationKind::Query, name)
    }

    /// Start a fluent `mutation`, discarding any previously loaded document
    /// or fluent operation.
    pub fn mutation(&mut self, name: Option<&str>) -> &mut Self {
        self.start_operation(OperationKind::Mutation, name)
    }

    /// Start a fluent `subscription`, discarding any previously loaded
    /// document or fluent operation.
    pub fn subscription(&mut self, name: Option<&str>) -> &mut Self {
        self.start_operation(OperationKind::Subscription, name)
    }

    /// Append a leaf field to the current selection scope.
    pub fn field(&mut self, name: impl Into<String>) -> &mut Self {
        self.field_with(name, Arguments::new(), None)
    }

    /// Append a leaf field with arguments and an optional alias to the
    /// current selection scope.
    pub fn field_with<K, V>(
        &mut self,
        name: impl Into<String>,
        arguments: impl IntoIterator<Item = (K, V)>,
        alias: Option<&str>,
    ) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let arguments = collect_arguments(arguments);
        let alias = alias.map(str::to_string);
        self.operation_mut().tree_mut().add_field(name, arguments, alias);
        self
    }

    /// Append an object field to the current selection scope and descend
    /// into it. Close it with [`QueryComposer::end`].
    pub fn object(&mut self, name: impl Into<String>) -> &mut Self {
        self.object_with(name, Arguments::new(), None)
    }

    /// Like [`QueryComposer::object`], with arguments and an optional alias.
    pub fn object_with<K, V>(
        &mut self,
        name: impl Into<String>,
        arguments: impl IntoIterator<Item = (K, V)>,
        alias: Option<&str>,
    ) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let arguments = collect_arguments(arguments);
        let alias = alias.map(str::to_string);
        self.operation_mut().tree_mut().open_object(name, arguments, alias);
        self
    }

    /// Close the most recently opened object.
    ///
    /// Fails with [`QueryComposeError::UnbalancedScope`] when no object is
    /// open.
    pub fn end(&mut self) -> Result<&mut Self> {
        match self.operation.as_mut() {
            Some(operation) => operation.tree_mut().close_object()?,
            None => return Err(QueryComposeError::UnbalancedScope),
        }
        Ok(self)
    }

    /// The fluent operation under construction, if any.
    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }

    fn start_operation(&mut self, kind: OperationKind, name: Option<&str>) -> &mut Self {
        if !self.document.is_empty() {
            tracing::debug!("fluent operation discards previously loaded document");
        }
        self.document.clear();
        self.operation = Some(Operation::new(kind, name.map(str::to_string)));
        self
    }

    /// The current fluent operation, implicitly starting an anonymous query
    /// if none is open.
    fn operation_mut(&mut self) -> &mut Operation {
        if self.operation.is_none() {
            tracing::debug!("implicitly starting an anonymous query");
            self.start_operation(OperationKind::Query, None);
        }
        self.operation.get_or_insert_with(|| Operation::new(OperationKind::Query, None))
    }

    // =========================================================================
    // Building
    // =========================================================================

    /// Clear the document, fluent operation, variables, and every registry.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::new();
        self
    }

    /// Assemble the final query.
    ///
    /// The document (serialized fluent operation, or raw text) has its
    /// fragment spreads resolved, then aliases and directives applied, then
    /// variable definitions injected. The variables map is returned as-is.
    pub fn build(&self) -> Result<ComposedQuery> {
        let document = match &self.operation {
            Some(operation) => {
                tracing::debug!(kind = ?operation.kind(), "serializing fluent operation");
                operation.to_graphql(&self.variable_definitions)?
            },
            None => self.document.clone(),
        };

        tracing::debug!(fragments = self.fragments.len(), "resolving fragments");
        let document = resolve_fragments(&document, &self.fragments)?;

        tracing::debug!(
            aliases = self.aliases.len(),
            directives = self.directives.len(),
            "applying aliases and directives",
        );
        let document = apply_aliases_and_directives(&document, &self.aliases, &self.directives);

        tracing::debug!(
            variable_definitions = self.variable_definitions.len(),
            "injecting variable definitions",
        );
        let query = inject_variable_definitions(&document, &self.variable_definitions);

        Ok(ComposedQuery {
            query,
            variables: self.variables.clone(),
        })
    }
}
