use crate::Arguments;
use crate::Operation;
use crate::OperationKind;
use crate::QueryComposeError;
use crate::SelectionNode;
use crate::SelectionTree;
use crate::Value;
use crate::VariableDefinition;
use crate::VariableDefinitions;
use crate::collect_arguments;
use indoc::indoc;
use pretty_assertions::assert_eq;

#[test]
fn root_frame_cannot_be_closed() {
    let mut tree = SelectionTree::new();
    assert!(matches!(tree.close_object(), Err(QueryComposeError::UnbalancedScope)));
    assert_eq!(tree.open_depth(), 0);
}

#[test]
fn objects_push_and_pop_scopes() {
    let mut tree = SelectionTree::new();
    let user = tree.open_object("user", Arguments::new(), None);
    let id = tree.add_field("id", Arguments::new(), None);
    assert_eq!(tree.open_depth(), 1);
    tree.close_object().unwrap();
    let after = tree.add_field("after", Arguments::new(), None);

    assert_eq!(tree.root(), &[user, after]);
    match tree.node(user) {
        Some(SelectionNode::Object { children, .. }) => assert_eq!(children, &vec![id]),
        other => panic!("Expected an object node, got {other:?}"),
    }
    assert!(matches!(tree.close_object(), Err(QueryComposeError::UnbalancedScope)));
}

#[test]
fn node_accessors() {
    let mut tree = SelectionTree::new();
    let id = tree.add_field(
        "user",
        collect_arguments([("role", "ADMIN")]),
        Some("admin".to_string()),
    );
    let node = tree.node(id).unwrap();
    assert_eq!(node.name(), "user");
    assert_eq!(node.alias(), Some("admin"));
    assert_eq!(node.arguments().get("role"), Some(&Value::from("ADMIN")));
}

#[test]
fn node_from_another_tree_is_not_found() {
    let mut other = SelectionTree::new();
    other.add_field("a", Arguments::new(), None);
    let foreign = other.add_field("b", Arguments::new(), None);

    let tree = SelectionTree::new();
    assert_eq!(tree.node(foreign), None);
    assert!(other.node(foreign).is_some());
}

#[test]
fn empty_operation_fails_to_serialize() {
    let operation = Operation::new(OperationKind::Query, None);
    assert!(matches!(
        operation.to_graphql(&VariableDefinitions::new()),
        Err(QueryComposeError::EmptySelection),
    ));
}

#[test]
fn nested_selections_serialize_with_two_space_indent() {
    let mut operation = Operation::new(OperationKind::Query, Some("GetUser".to_string()));
    let tree = operation.tree_mut();
    tree.open_object("user", collect_arguments([("id", "$userId")]), None);
    tree.add_field("id", Arguments::new(), None);
    tree.add_field("name", Arguments::new(), None);
    tree.open_object("profile", Arguments::new(), None);
    tree.add_field("avatar", Arguments::new(), None);
    tree.add_field("bio", Arguments::new(), None);
    tree.close_object().unwrap();
    tree.close_object().unwrap();

    assert_eq!(
        operation.to_graphql(&VariableDefinitions::new()).unwrap(),
        indoc! {"
            query GetUser {
              user(id: $userId) {
                id
                name
                profile {
                  avatar
                  bio
                }
              }
            }"},
    );
}

#[test]
fn definitions_render_after_operation_name() {
    let mut operation = Operation::new(OperationKind::Query, Some("GetUser".to_string()));
    operation.tree_mut().add_field("viewer", Arguments::new(), None);
    let definitions: VariableDefinitions = [
        VariableDefinition::new("userId", "ID!", None),
        VariableDefinition::new("includeProfile", "Boolean", Some(Value::from(false))),
    ]
        .into_iter()
        .map(|def| (def.name().to_string(), def))
        .collect();

    assert_eq!(
        operation.to_graphql(&definitions).unwrap(),
        "query GetUser($userId: ID!, $includeProfile: Boolean = false) {\n  viewer\n}",
    );
}

#[test]
fn anonymous_mutation_with_aliased_object() {
    let mut operation = Operation::new(OperationKind::Mutation, None);
    let tree = operation.tree_mut();
    tree.open_object(
        "createUser",
        collect_arguments([("input", "$input")]),
        Some("newUser".to_string()),
    );
    tree.add_field("id", Arguments::new(), None);

    assert_eq!(
        operation.to_graphql(&VariableDefinitions::new()).unwrap(),
        "mutation {\n  newUser: createUser(input: $input) {\n    id\n  }\n}",
    );
}

#[test]
fn operation_keywords() {
    assert_eq!(OperationKind::Query.keyword(), "query");
    assert_eq!(OperationKind::Mutation.keyword(), "mutation");
    assert_eq!(OperationKind::Subscription.keyword(), "subscription");
}
