pub mod document;
pub mod job;
pub mod pipeline;
pub mod synthesis;
