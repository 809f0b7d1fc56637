//! @ai:module:intent Provider adapters and the benchmark runner
//! @ai:module:layer infrastructure
//! @ai:module:public_api Provider, ProviderAdapter, Adapter, create_adapter, BenchmarkRunner, RateLimiter

pub mod anthropic;
pub mod client;
pub mod executor;
pub mod gemini;
pub mod openai;
pub mod rate_limiter;

pub use client::{
    create_adapter, Adapter, HttpContext, MockAdapter, MockReply, Provider, ProviderAdapter,
};
pub use executor::BenchmarkRunner;
pub use rate_limiter::{RateLimiter, RateLimiterTrait};
