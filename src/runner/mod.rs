//! Minimal agent host
//!
//! A [`Runner`] drives an [`Agent`] through invocations against a [`ModelBackend`],
//! executing the tools the model requests and firing the agent's lifecycle hooks at every
//! stage. It exists so the event logger can be exercised end to end without a hosted
//! model.

pub mod agent;
pub mod agent_runner;
pub mod backend;
pub mod session;

pub use agent::{Agent, AgentBuilder};
pub use agent_runner::{RunOutput, Runner, DEFAULT_MAX_LLM_CALLS};
pub use backend::ModelBackend;
pub use session::Session;
