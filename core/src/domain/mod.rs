//! Domain layer: entities and value types

pub mod entities;

pub use entities::verification_record::{
    CodeState, VerificationRecord, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS,
};
