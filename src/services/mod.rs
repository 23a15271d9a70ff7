pub mod admin_directory;
pub mod registry;
pub mod storage;
pub mod token_store;
