pub mod check;
pub mod plot;
pub mod run;
