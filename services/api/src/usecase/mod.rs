pub mod backlog;
pub mod game;
pub mod rating;
pub mod recommendation;
pub mod similarity;
pub mod token;
pub mod user;
