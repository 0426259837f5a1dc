pub mod confirm_email;
pub mod login;
pub mod resend_verification;
pub mod sign_up;
