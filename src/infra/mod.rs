//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod github;
pub mod http;
pub mod resend;
pub mod supabase;
pub mod telemetry;
pub mod turnstile;
