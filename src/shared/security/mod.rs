pub mod access_policy;
pub mod session_gate;

pub use access_policy::AccessPolicy;
pub use session_gate::SessionGate;
