//! promptlens — interactive dashboard for manually evaluating hosted LLM
//! endpoints.
//!
//! Every submitted prompt is logged to a flat CSV interaction table together
//! with the response, latency, and model identifier; user feedback (thumbs
//! up/down, hallucination flag) is attached after the fact; aggregate stats
//! and three summary charts are derived from the full table.

pub mod analytics;
pub mod charts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod llm;
pub mod store;
pub mod web;
