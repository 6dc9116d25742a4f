pub mod add;
pub mod common;
pub mod delete;
pub mod edit;
pub mod favorites;
pub mod list;
pub mod pending;
pub mod purge;
pub mod show;
