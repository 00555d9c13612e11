use crate::Arguments;
use crate::QueryComposeError;
use crate::value::format_arguments;
use crate::variable_definition::VariableDefinitions;
use crate::variable_definition::format_variable_definitions;

type Result<T> = std::result::Result<T, QueryComposeError>;

const INDENT: &str = "  ";

/// Which kind of top-level operation is being built.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationKind {
    Mutation,
    Query,
    Subscription,
}
impl OperationKind {
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Query,
        OperationKind::Mutation,
        OperationKind::Subscription,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Mutation => "mutation",
            Self::Query => "query",
            Self::Subscription => "subscription",
        }
    }
}

/// Handle to a [`SelectionNode`] owned by a [`SelectionTree`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SelectionNodeId(usize);

#[derive(Clone, Debug, PartialEq)]
pub enum SelectionNode {
    Field {
        alias: Option<String>,
        arguments: Arguments,
        name: String,
    },
    Object {
        alias: Option<String>,
        arguments: Arguments,
        children: Vec<SelectionNodeId>,
        name: String,
    },
}
impl SelectionNode {
    pub fn alias(&self) -> Option<&str> {
        match self {
            Self::Field { alias, .. } | Self::Object { alias, .. } => alias.as_deref(),
        }
    }

    pub fn arguments(&self) -> &Arguments {
        match self {
            Self::Field { arguments, .. } | Self::Object { arguments, .. } => arguments,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Field { name, .. } | Self::Object { name, .. } => name.as_str(),
        }
    }

    /// `[alias: ]name[(args)]`
    fn header(&self) -> String {
        let mut header = String::new();
        if let Some(alias) = self.alias() {
            header.push_str(alias);
            header.push_str(": ");
        }
        header.push_str(self.name());
        header.push_str(&format_arguments(self.arguments()));
        header
    }
}

/// One frame of the fluent scope stack.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Scope {
    Root,
    Object(SelectionNodeId),
}

/// An arena-owned selection tree plus the stack of scopes that fluent
/// `field`/`object`/`end` calls append into.
///
/// The stack always holds the root frame, which can never be popped.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionTree {
    nodes: Vec<SelectionNode>,
    root: Vec<SelectionNodeId>,
    scopes: Vec<Scope>,
}
impl SelectionTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            root: vec![],
            scopes: vec![Scope::Root],
        }
    }

    /// Append a leaf field to the current scope.
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        arguments: Arguments,
        alias: Option<String>,
    ) -> SelectionNodeId {
        self.push_node(SelectionNode::Field {
            alias,
            arguments,
            name: name.into(),
        })
    }

    /// Append an object field to the current scope and make its children the
    /// new current scope.
    pub fn open_object(
        &mut self,
        name: impl Into<String>,
        arguments: Arguments,
        alias: Option<String>,
    ) -> SelectionNodeId {
        let id = self.push_node(SelectionNode::Object {
            alias,
            arguments,
            children: vec![],
            name: name.into(),
        });
        self.scopes.push(Scope::Object(id));
        id
    }

    /// Return to the scope enclosing the most recently opened object.
    pub fn close_object(&mut self) -> Result<()> {
        if self.scopes.len() <= 1 {
            return Err(QueryComposeError::UnbalancedScope);
        }
        self.scopes.pop();
        Ok(())
    }

    /// Number of objects currently open.
    pub fn open_depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// `None` if `id` was not issued by this tree.
    pub fn node(&self, id: SelectionNodeId) -> Option<&SelectionNode> {
        self.nodes.get(id.0)
    }

    /// Top-level selections in the order they were added.
    pub fn root(&self) -> &[SelectionNodeId] {
        self.root.as_slice()
    }

    fn push_node(&mut self, node: SelectionNode) -> SelectionNodeId {
        let id = SelectionNodeId(self.nodes.len());
        self.nodes.push(node);
        let scope = *self.scopes.last().unwrap_or(&Scope::Root);
        match scope {
            Scope::Root => self.root.push(id),
            Scope::Object(parent) => {
                if let Some(SelectionNode::Object { children, .. }) = self.nodes.get_mut(parent.0) {
                    children.push(id);
                }
            },
        }
        id
    }

    /// Write each selection of `ids` on its own line at `depth` levels of
    /// indentation, recursing into object children.
    fn write_selections(&self, out: &mut String, ids: &[SelectionNodeId], depth: usize) {
        for id in ids {
            let Some(node) = self.node(*id) else {
                continue;
            };
            let indent = INDENT.repeat(depth);
            out.push_str(&indent);
            out.push_str(&node.header());
            if let SelectionNode::Object { children, .. } = node {
                out.push_str(" {\n");
                self.write_selections(out, children, depth + 1);
                out.push_str(&indent);
                out.push('}');
            }
            out.push('\n');
        }
    }
}
impl Default for SelectionTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A fluently built `query`/`mutation`/`subscription`.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    kind: OperationKind,
    name: Option<String>,
    tree: SelectionTree,
}
impl Operation {
    pub fn new(kind: OperationKind, name: Option<String>) -> Self {
        Self {
            kind,
            name,
            tree: SelectionTree::new(),
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn tree(&self) -> &SelectionTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SelectionTree {
        &mut self.tree
    }

    /// Serialize as GraphQL text, placing `definitions` right after the
    /// operation keyword and name.
    pub fn to_graphql(&self, definitions: &VariableDefinitions) -> Result<String> {
        if self.tree.is_empty() {
            return Err(QueryComposeError::EmptySelection);
        }
        if self.tree.open_depth() > 0 {
            tracing::debug!(
                open_objects = self.tree.open_depth(),
                "serializing operation with unclosed objects",
            );
        }

        let mut out = String::from(self.kind.keyword());
        if let Some(name) = &self.name {
            out.push(' ');
            out.push_str(name);
        }
        out.push_str(&format_variable_definitions(definitions));
        out.push_str(" {\n");
        self.tree.write_selections(&mut out, self.tree.root(), 1);
        out.push('}');
        Ok(out)
    }
}
