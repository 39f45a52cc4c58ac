//! SmartUTM - UTM link builder service
//!
//! This library tags content URLs with UTM parameters: channel presets,
//! a global placeholder template, per-item generated links, bulk
//! regeneration and a REST surface over all of it.
//!
//! # Architecture
//! - `utm`: URL builder, placeholder substitution and sanitizers
//! - `services`: presets, templates, link store, bulk processor, settings and integrations
//! - `storage`: SeaORM-backed option, metadata and content storage
//! - `api`: HTTP handlers, JWT auth and nonce middleware
//! - `interfaces`: CLI commands
//! - `config`: static configuration (TOML + env)
//! - `runtime`: startup wiring and execution modes
//! - `system`: logging and the in-process event bus

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
pub mod utm;
