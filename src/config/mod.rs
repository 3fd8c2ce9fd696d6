//! Configuración del proyecto
//!
//! Este módulo contiene la lectura de variables de entorno del servicio.

pub mod environment;

pub use environment::{ConfigError, EnvironmentConfig};
