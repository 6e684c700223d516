/// Score board entities and defensive normalization helpers.
pub mod models;
/// Score store trait and its backends.
pub mod score_store;
/// Storage abstraction layer shared by every backend.
pub mod storage;
