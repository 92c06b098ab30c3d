//! MySQL repository implementations

mod verification_repository_impl;

pub use verification_repository_impl::MySqlVerificationRepository;
