//! # API Route Modules
//!
//! - `contracts`: `POST /api/enviar-contrato`, the contract relay endpoint.

pub mod contracts;
