/*!
 * Main test entry point for polint test suite
 */

// Import unit tests
mod unit {
    // Variable tokenizer tests
    pub mod variables_tests;

    // Transform pipeline tests
    pub mod pipeline_tests;

    // Lint engine tests
    pub mod linter_tests;

    // PO catalog parsing tests
    pub mod catalog_tests;
}

// Import integration tests
mod integration {
    // End-to-end lint workflow tests
    pub mod lint_workflow_tests;

    // End-to-end translate workflow tests
    pub mod translate_workflow_tests;
}
