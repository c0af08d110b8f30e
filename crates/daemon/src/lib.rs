//! Clearance simulator daemon: state store, sequence player, clearance responder and the
//! HTTP/WebSocket surface in front of them.

pub mod clearance;
pub mod config;
pub mod feed;
pub mod http;
pub mod player;
pub mod service;
pub mod state;
pub mod ws;
