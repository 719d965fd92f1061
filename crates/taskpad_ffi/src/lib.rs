//! Flutter bridge surface for Taskpad core.

pub mod api;
