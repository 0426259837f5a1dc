pub mod verification_mailer;

pub use verification_mailer::VerificationMailer;
