pub mod dto;
pub mod subject_service;
