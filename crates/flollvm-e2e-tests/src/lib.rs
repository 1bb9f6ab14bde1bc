//! End-to-end tests for flollvm live under `tests/`.
