// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod entry_sheet;
pub mod exam;
pub mod goal;
pub mod interview;
pub mod profile;
pub mod question;
