pub mod attachments;
pub mod complaint_service;
pub mod partial_update;
pub mod storage;
