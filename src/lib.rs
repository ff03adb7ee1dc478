//! TinyTalk - a declarative rule language for the tinyland tabletop surface
//!
//! This crate provides:
//! - A parser for the TinyTalk rule language
//! - A forward-chaining rule engine over a live scene of tagged objects
//! - A host binding physical markers (UDP/OSC) and renderers (websocket)
//!   to that engine

pub mod config;
pub mod engine;
pub mod server;
pub mod tinytalk_parser;
