mod common;
mod composite_tests;
