// handlers/protected/mod.rs - Protected handlers (access token required)
//
// Resource CRUD for the authenticated user. Task/note/goal/habit routes
// sit behind the auth middleware; user routes authenticate through the
// AuthUser extractor because POST /users on the same path is public.

pub mod goals;
pub mod habits;
pub mod notes;
pub mod tasks;
pub mod users;
