//! LLM proxy health checker
//!
//! Registers a user against the proxy, then probes each provider route
//! (opensource, OpenAI, Anthropic) with the issued bearer token and reports
//! PASS/FAIL per provider.

pub mod cli;
pub mod config;
pub mod core;
