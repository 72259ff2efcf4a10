mod filter_tests;
mod format_tests;
