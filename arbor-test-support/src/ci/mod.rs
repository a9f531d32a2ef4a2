//! Environment-driven knobs shared by the test suites.

pub mod property_test_profile;
