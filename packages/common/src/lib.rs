//! Content-addressed blob storage shared by the plagcheck services.

pub mod storage;
