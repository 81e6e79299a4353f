pub mod create;
pub mod init;
pub mod list;
pub mod remove;
pub mod run;
pub mod step;
pub mod update;
