// Resume generation: prompt templating, the remote call with its fallback
// policy, and the two HTTP endpoints.
// All inference calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
