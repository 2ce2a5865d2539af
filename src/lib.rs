//! Workspace-level integration tests for MemoFib live under `tests/`.
