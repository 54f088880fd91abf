pub mod game;
pub mod result;
pub mod round;
