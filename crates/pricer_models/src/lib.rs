//! # Pricer Models (L2: Business Logic)
//!
//! Barrier option instruments and their closed-form Black-model valuation.
//!
//! This crate provides:
//! - Instrument definitions (vanilla options, continuously monitored barriers)
//! - Generalised Black-Scholes vanilla pricing with analytic Greeks
//! - Single-barrier valuation via the 16-way reflection-term dispatch table
//! - Adjoint (reverse-mode) sensitivities of the barrier price
//! - A bump-and-revalue cross-check of the adjoint engine
//!
//! ## Design Principles
//!
//! - **Stateless engines**: pricers hold only a normal-distribution provider
//!   and a tolerance, so one instance can be shared across threads
//! - **Table-driven dispatch**: the barrier combination is a `const` lookup,
//!   not nested conditionals
//! - **Fail fast**: invalid inputs are rejected before any floating-point work
//!
//! ## Example
//!
//! ```
//! use pricer_models::analytical::barrier::BlackBarrierPricer;
//! use pricer_models::instruments::{Barrier, BarrierDirection, KnockType, VanillaOption};
//!
//! let option = VanillaOption::call(100.0, 1.0).unwrap();
//! let barrier = Barrier::new(KnockType::Out, BarrierDirection::Down, 90.0).unwrap();
//! let pricer = BlackBarrierPricer::new();
//!
//! let price = pricer.price(&option, &barrier, 0.0, 105.0, 0.03, 0.05, 0.2).unwrap();
//! assert!(price > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
