pub mod access;
pub mod config;
pub mod session;
pub mod sql;
pub mod storage;
