pub mod game;
pub mod game_match;
pub mod person;
