//! Supabase project client: auth health and user lookup over HTTPS.

mod client;
mod config;

pub use client::{RemoteUser, SupabaseClient, UserLookupError};
pub use config::SupabaseConfig;
