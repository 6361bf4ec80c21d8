pub mod exec;
pub mod profiles;
pub mod state;
