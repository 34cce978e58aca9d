pub mod cache;
pub mod db;
pub mod gemini;
pub mod igdb;
pub mod password;
