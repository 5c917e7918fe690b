pub mod preset;
pub mod run;
