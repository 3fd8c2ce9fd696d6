//! DTOs de la API HTTP

pub mod api_response;
pub mod alert_dto;
pub mod report_dto;
