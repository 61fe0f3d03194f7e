// src/core/mod.rs — Session state and conversation assembly

pub mod assembler;
pub mod binding;
pub mod controller;
pub mod persona;
pub mod session;
