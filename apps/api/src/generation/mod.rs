// Generation: prompts → collaborator call → tolerant parsing → fallback,
// plus the session pipeline that joins both results into history.
// All generation calls go through llm_client::TextGenerator.

pub mod fallback;
pub mod handlers;
pub mod orchestrator;
pub mod parser;
pub mod pipeline;
pub mod prompts;
