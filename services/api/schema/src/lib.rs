//! sea-orm entities for the PlayNext API database.

pub mod backlog_items;
pub mod games;
pub mod ratings;
pub mod recommendations;
pub mod users;
