pub mod error;
pub mod material_service;
