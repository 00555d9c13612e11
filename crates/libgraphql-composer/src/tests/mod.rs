mod lexical_scanner_tests;
mod selection_tree_tests;
mod variable_definition_tests;
