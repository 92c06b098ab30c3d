//! Email delivery implementations of the code sender port

mod mock;
mod smtp;

pub use mock::{MockEmailSender, RecordedEmail};
pub use smtp::SmtpCodeSender;
