pub mod profiles;
pub mod speech;
pub mod storage;
