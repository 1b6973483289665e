// src/services/mod.rs
pub mod agent_client;
pub mod constraints;
pub mod conversation;
pub mod health_monitor;
pub mod identity;
pub mod landing;
pub mod orchestrator;
