//! Pure turn-pipeline logic (C1-C11): every stage operates on `TurnContext` and
//! `ReferenceRuntime`, with no I/O and no session-store dependency.

pub mod duration;
pub mod stages;

#[cfg(test)]
mod test_support;

pub use stages::orchestrator::handle_turn;
