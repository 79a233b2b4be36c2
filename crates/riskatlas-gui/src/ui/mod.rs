//! UI panels for the RiskAtlas dashboard.

pub mod alerts;
pub mod chat;
pub mod cost_simulator;
pub mod country_info;
pub mod country_search;
pub mod dashboard;
pub mod forecast;
pub mod header;
pub mod map;
pub mod rankings;
pub mod suppliers;
pub mod supply_chain;
pub mod theme;
