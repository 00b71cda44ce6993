//! Integration tests for gex-profile.

mod exposure_tests;
mod pipeline_tests;
