pub mod observation;
pub mod round;
pub mod table;
pub mod world;
