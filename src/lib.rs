pub mod analyzer;
pub mod cmd;
pub mod config;
pub mod database;
pub mod diagram;
pub mod presentation;
