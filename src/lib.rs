//! Organizer - a local-first personal organizer for notes, tasks, contacts and finances

pub mod commands;
pub mod config;
pub mod console;
pub mod interchange;
pub mod models;
pub mod query;
pub mod schema;
pub mod storage;
pub mod store;
pub mod validation;
