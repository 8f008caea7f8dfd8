//! Core types and trait definitions for Gatehouse.
//!
//! This crate has no HTTP or database dependencies. It owns the
//! account model, the [`store::AccountStore`] and
//! [`hasher::CredentialHasher`] seams, and the approval state machine in
//! [`registry`]. Every other crate depends on it.

#![allow(async_fn_in_trait)]

pub mod account;
pub mod error;
pub mod hasher;
pub mod registry;
pub mod store;
pub mod wire;

pub use error::{Error, Result};
