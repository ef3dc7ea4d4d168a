//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod hmac_signature_verifier;
mod in_memory_record_store;
mod postgres_record_store;
mod supabase_auth_provider;

pub use hmac_signature_verifier::HmacSha256SignatureVerifier;
pub use in_memory_record_store::InMemoryRecordStore;
pub use postgres_record_store::PostgresRecordStore;
pub use supabase_auth_provider::SupabaseAuthProvider;
