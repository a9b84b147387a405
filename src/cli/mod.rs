pub mod commands;
pub mod serve;
