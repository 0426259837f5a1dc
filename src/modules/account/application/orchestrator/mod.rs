pub mod sign_up_flow;
