// handlers/mod.rs - Two-tier handler architecture
//
// Public (no auth: token acquisition, anonymous user create) and
// Protected (access-token auth: resource CRUD).

pub mod protected;
pub mod public;
