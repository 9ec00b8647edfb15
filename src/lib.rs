// SCALE DRIVER LIBRARY
// EVERYTHING THE BINARY DOES LIVES HERE SO tests/ CAN DRIVE IT DIRECTLY.

pub mod config;
pub mod driver;
pub mod duration;
pub mod error;
pub mod event;
pub mod growth;
pub mod logging;
pub mod plot;
pub mod recovery;
pub mod round;
pub mod supervise;
pub mod template;
