mod builder_tests;
mod record_tests;
