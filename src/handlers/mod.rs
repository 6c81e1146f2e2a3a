// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod destination;
pub mod event;
pub mod gallery;
pub mod review;
pub mod umkm;
