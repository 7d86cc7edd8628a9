//! Agency catalog server library.
//!
//! Property catalog with slug-addressed detail pages, filtered search,
//! contact notifications and a back-office, served with actix-web on SeaORM.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
