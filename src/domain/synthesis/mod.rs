pub mod chunk;
pub mod dispatcher;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use chunk::{Chunk, ChunkOutcome, DispatchProgress, DispatchReport};
pub use dispatcher::{ChunkDispatcher, DEFAULT_CONCURRENCY};
pub use worker::SynthesisWorker;
