//! ff-thermo: thermodynamic collaborators consumed by the boundary and network crates.
//!
//! Provides:
//! - Component and phase/system state representation
//! - `ThermoSystem` trait (K-values, flash, phase transport properties)
//! - `ReactionKinetics` trait for the reactive boundary layer
//! - `IdealSolution`: a Raoult/Antoine reference model with fixed transport data
//! - `FirstOrderReaction`: Arrhenius first-order A → B kinetics
//!
//! # Architecture
//!
//! The traits here are the only surface the rest of filmflow sees. Real
//! equation-of-state packages plug in behind `ThermoSystem`; the reference
//! implementations exist so the solvers can be exercised without one.
//!
//! # Example
//!
//! ```
//! use ff_thermo::{Component, IdealSolution, KValue, ThermoSystem};
//! use ff_core::units::{k, pa};
//!
//! let model = IdealSolution::new(vec![
//!     (Component::new("light", 0.030), KValue::Fixed(4.0)),
//!     (Component::new("heavy", 0.090), KValue::Fixed(0.25)),
//! ])
//! .unwrap();
//!
//! let flash = model.flash(k(300.0), pa(1e5), &[0.5, 0.5]).unwrap();
//! assert!(flash.vapor_fraction > 0.0 && flash.vapor_fraction < 1.0);
//! ```

pub mod component;
pub mod error;
pub mod ideal;
pub mod kinetics;
pub mod model;
pub mod state;

pub use component::Component;
pub use error::{ThermoError, ThermoResult};
pub use ideal::{IdealSolution, KValue, PhaseTransportData};
pub use kinetics::{FirstOrderReaction, ReactionKinetics};
pub use model::{FlashResult, PhaseProperties, ThermoSystem};
pub use state::{Phase, PhaseState, SystemState};
