//! Multi-modal urban route planner server.
//!
//! A web application that answers: "How do I get from here to there across
//! town, by bus, tram, taxi or on foot, with the money I have on me?"

pub mod distance;
pub mod domain;
pub mod fare;
pub mod network;
pub mod planner;
pub mod web;
