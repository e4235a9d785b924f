//! GFG Profile API Library
//!
//! Scrapes a user's public coding profile from two independent upstream
//! sources (the server-rendered profile page and the submissions API) and
//! merges them into one canonical record.
//!
//! # Modules
//!
//! - `api`: HTTP-layer components.
//! - `core`: Extraction and merge pipeline.
//! - `integrations`: Upstream clients and side channels.
//! - `analytics`: Analytics events and the fetch observer interface.
//! - `app`: Router assembly and OpenAPI document.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `extractor`: Escaping-aware field extraction.
//! - `handlers`: HTTP request handlers.
//! - `locator`: Text window location inside the profile page.
//! - `middleware`: Request timing and analytics middleware.
//! - `models`: Profile record and breakdown models.
//! - `orchestrator`: Concurrent fetch and merge.
//! - `services`: Profile page and submissions API clients.

pub mod api;
pub mod core;
pub mod integrations;

pub mod analytics;
pub mod app;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod handlers;
pub mod locator;
pub mod middleware;
pub mod models;
pub mod orchestrator;
pub mod services;
