//! One adapter per supported backend.
//!
//! Ollama, OpenAI, and Anthropic all speak the OpenAI-compatible chat
//! completions surface and share the transport in [`chat`]; Gemini has
//! its own wire format and its own transport.

#[cfg(feature = "provider-anthropic")]
pub mod anthropic;
#[cfg(feature = "provider-openai")]
pub mod chat;
#[cfg(feature = "provider-gemini")]
pub mod gemini;
#[cfg(feature = "provider-ollama")]
pub mod ollama;
#[cfg(feature = "provider-openai")]
pub mod openai;
