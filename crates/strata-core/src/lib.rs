//! Strata Core Types and Definitions
//!
//! This crate provides the data contracts shared by the Strata diagram
//! synthesis pipeline. It carries no pipeline behavior. It includes:
//!
//! - **Identifiers**: String-interned identifiers ([`identifier::Id`], [`identifier::EntityId`])
//! - **Geometry**: Points and sizes in diagram space ([`geometry`] module)
//! - **Model**: Parsed classes, interfaces, members and relationships ([`model`] module)
//! - **Diagram**: Sized, positioned nodes and styled edges handed to a renderer ([`diagram`] module)

pub mod diagram;
pub mod geometry;
pub mod identifier;
pub mod model;
