//! GameScores API - hypermedia service for recording games, players and match scores
//!
//! Every resource is served as a Mason document (`application/vnd.mason+json`):
//! - Games with a unique name and a score type
//! - Persons who take part in matches
//! - Matches recording a person's score in a game

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod extract;
pub mod mason;
pub mod routes;
pub mod schema;
pub mod state;
