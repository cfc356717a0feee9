//! Property-based tests for plan layout, slugs and link scoring

mod determinism;
