//! Wire protocol messages exchanged with the client.
//!
//! - **Domain**: message types, headers, content shapes and the envelope
//!   ([`domain::MessageEnvelope`])
//! - **Codec**: JSON encoding and decoding of envelopes
//!   ([`codec::EnvelopeCodec`])
//! - **Errors**: decode and unsupported-direction failures
//!   ([`error::CodecError`])

pub mod codec;
pub mod domain;
pub mod error;

#[cfg(test)]
mod tests;
