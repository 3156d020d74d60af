//! Users domain model

pub mod entities;
