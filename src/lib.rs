//! Game Industry Dashboard: dataset loading, the filter/aggregate engine,
//! configuration and the HTTP front-end shared by the binaries.

pub mod config;
pub mod data;
pub mod web;
