pub mod batch_writer;
pub mod db;
pub mod db_structs;
pub mod memory_store;
pub mod snapshot_store;
