pub mod access_steps;
pub mod session_steps;
