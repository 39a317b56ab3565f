//! Engine integration suites, grouped by lifecycle flow.

mod harness;

mod stop_and_failure;
