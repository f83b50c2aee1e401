//! LLM-backed research and judgment collaborators.
//!
//! Implements [`Researcher`](crate::port::Researcher) and
//! [`Judge`](crate::port::Judge) by prompting an [`Llm`](crate::port::Llm).
//! Both return the model's raw text; parsing happens in the application
//! layer.

pub mod judge;
pub mod research;

pub use judge::LlmJudge;
pub use research::LlmResearcher;
