pub mod db;
pub mod speech;
pub mod storages;
