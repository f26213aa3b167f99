//! End-to-end tests: suites, fixtures and quantified assertions driven
//! through the public behave_core API.

mod harness;
mod scenarios;
