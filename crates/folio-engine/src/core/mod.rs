pub mod clock;
pub mod elements;
pub mod loading;
pub mod rng;
pub mod time;
