use crate::Value;
use crate::VariableDefinition;
use crate::VariableDefinitions;
use crate::format_variable_definitions;
use crate::inject_variable_definitions;
use indoc::indoc;
use pretty_assertions::assert_eq;

fn definitions(defs: Vec<VariableDefinition>) -> VariableDefinitions {
    defs.into_iter()
        .map(|def| (def.name().to_string(), def))
        .collect()
}

fn id_definition() -> VariableDefinitions {
    definitions(vec![VariableDefinition::new("id", "ID!", None)])
}

#[test]
fn definitions_render_in_registration_order() {
    let defs = definitions(vec![
        VariableDefinition::new("id", "ID!", None),
        VariableDefinition::new("limit", "Int", Some(Value::from(10))),
        VariableDefinition::new("name", "String", Some(Value::from("test"))),
    ]);

    assert_eq!(
        inject_variable_definitions("query { user { id } }", &defs),
        r#"query($id: ID!, $limit: Int = 10, $name: String = "test") { user { id } }"#,
    );
}

#[test]
fn definitions_follow_operation_name() {
    assert_eq!(
        inject_variable_definitions("query GetUser { user { id } }", &id_definition()),
        "query GetUser($id: ID!) { user { id } }",
    );
}

#[test]
fn comment_between_keyword_and_name_is_skipped() {
    assert_eq!(
        inject_variable_definitions(
            "query # note\n  GetUser { user { id } }",
            &id_definition(),
        ),
        "query # note\n  GetUser($id: ID!) { user { id } }",
    );
}

#[test]
fn comment_before_existing_definitions_is_skipped() {
    let document = "query GetUser # note\n($id: ID!) { user(id: $id) { id } }";
    assert_eq!(inject_variable_definitions(document, &id_definition()), document);
}

#[test]
fn definitions_attach_to_mutation() {
    let defs = definitions(vec![VariableDefinition::new("input", "CreateUserInput!", None)]);
    assert_eq!(
        inject_variable_definitions("mutation { createUser { id } }", &defs),
        "mutation($input: CreateUserInput!) { createUser { id } }",
    );
}

#[test]
fn definitions_attach_to_subscription() {
    assert_eq!(
        inject_variable_definitions("subscription OnUser { userUpdated { id } }", &id_definition()),
        "subscription OnUser($id: ID!) { userUpdated { id } }",
    );
}

#[test]
fn existing_definitions_are_never_merged() {
    let document = "query GetUser($id: ID!) { user(id: $id) { id name } }";
    let defs = definitions(vec![VariableDefinition::new("limit", "Int", None)]);
    assert_eq!(inject_variable_definitions(document, &defs), document);
}

#[test]
fn existing_definitions_detected_across_whitespace() {
    let document = "query GetUser ($id: ID!) { user(id: $id) { id } }";
    assert_eq!(inject_variable_definitions(document, &id_definition()), document);
}

#[test]
fn no_definitions_leaves_document_unchanged() {
    let document = "query { user { id } }";
    assert_eq!(
        inject_variable_definitions(document, &VariableDefinitions::new()),
        document,
    );
}

#[test]
fn shorthand_query_is_promoted() {
    assert_eq!(
        inject_variable_definitions("{ user { id } }", &id_definition()),
        "query($id: ID!) { user { id } }",
    );
}

#[test]
fn leading_comment_mentioning_keyword_is_skipped() {
    let document = indoc! {"
        # query (old) {
        query { user { id } }"};
    assert_eq!(
        inject_variable_definitions(document, &id_definition()),
        indoc! {"
            # query (old) {
            query($id: ID!) { user { id } }"},
    );
}

#[test]
fn fragment_definitions_before_operation_are_skipped() {
    let document = indoc! {"
        fragment F on User { id }
        query Q { user { ...F } }"};
    assert_eq!(
        inject_variable_definitions(document, &id_definition()),
        indoc! {"
            fragment F on User { id }
            query Q($id: ID!) { user { ...F } }"},
    );
}

#[test]
fn document_without_operation_is_unchanged() {
    let document = "fragment F on User { id }";
    assert_eq!(inject_variable_definitions(document, &id_definition()), document);
}

#[test]
fn default_values_of_each_scalar_kind() {
    let defs = definitions(vec![
        VariableDefinition::new("stringVar", "String", Some(Value::from("hello"))),
        VariableDefinition::new("intVar", "Int", Some(Value::from(42))),
        VariableDefinition::new("boolVar", "Boolean", Some(Value::from(true))),
        VariableDefinition::new("nullVar", "String", Some(Value::Null)),
        VariableDefinition::new("dollarVar", "String", Some(Value::from("$notAVariable"))),
    ]);

    assert_eq!(
        format_variable_definitions(&defs),
        "($stringVar: String = \"hello\", $intVar: Int = 42, \
        $boolVar: Boolean = true, $nullVar: String = null, \
        $dollarVar: String = \"$notAVariable\")",
    );
}

#[test]
fn leading_dollar_in_name_is_dropped() {
    let def = VariableDefinition::new("$id", "ID!", None);
    assert_eq!(def.name(), "id");
    assert_eq!(def.to_graphql(), "$id: ID!");
    assert!(!def.has_default());
}

#[test]
fn explicit_null_default_is_a_default() {
    let def = VariableDefinition::new("after", "String", Some(Value::Null));
    assert!(def.has_default());
    assert_eq!(def.default_value(), Some(&Value::Null));
}
