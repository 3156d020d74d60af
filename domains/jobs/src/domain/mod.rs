//! Jobs domain model

pub mod entities;
