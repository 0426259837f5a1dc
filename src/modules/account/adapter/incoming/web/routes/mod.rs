mod confirm_email;
mod login;
mod resend_verification;
mod sign_up;

pub use confirm_email::{
    __path_confirm_email_handler, confirm_email_handler, ConfirmEmailQuery, ConfirmEmailResponse,
};
pub use login::{__path_login_handler, login_handler, LoginBody, LoginResponse};
pub use resend_verification::{
    __path_resend_verification_handler, resend_verification_handler, ResendVerificationResponse,
};
pub use sign_up::{
    __path_sign_up_handler, sign_up_handler, SessionDto, SignUpBody, SignUpResponse, SignedUpAccount,
};
