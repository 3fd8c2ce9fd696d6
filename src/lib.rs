//! fuel_watch
//!
//! Detección de mal uso de combustible en una flota de vehículos: lee
//! registros de carga y vehículos de la API de flota, aplica reglas de
//! detección, ordena las alertas para triaje y genera reportes de consumo.

pub mod cache;
pub mod client;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
