// src/models/mod.rs

pub mod entry_sheet;
pub mod exam;
pub mod goal;
pub mod interview;
pub mod question;
pub mod user;
