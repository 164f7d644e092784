// Profile workflow: intake form, generated quiz, recommendations.
// All Gemini calls go through llm_client — no direct HTTP calls here.

pub mod handlers;
pub mod prompts;
pub mod search_link;
pub mod store;
pub mod workflow;
