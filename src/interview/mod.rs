// src/interview/mod.rs

pub mod client;
pub mod feedback;
pub mod session;
