//! Debate subprotocol: sessions, rounds and verdict strategies.

pub mod entities;
pub mod scoring;
