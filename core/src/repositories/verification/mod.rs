//! Verification record repository port and mock implementation

mod mock;
mod r#trait;

#[cfg(test)]
mod tests;

pub use mock::MockVerificationRepository;
pub use r#trait::VerificationRepository;
