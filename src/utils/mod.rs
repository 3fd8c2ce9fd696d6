//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, fechas y formato numérico.

pub mod errors;
pub mod dates;
pub mod numbers;
