mod batch_tests;
mod determinism_tests;
