//! Controladores
//!
//! Traducen DTOs de la API a llamadas de servicios.

pub mod alert_controller;
pub mod report_controller;
