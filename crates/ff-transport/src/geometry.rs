//! Pipe geometry definition.

use crate::common::check_positive;
use crate::error::TransportResult;
use ff_core::units::{Area, Length};
use std::f64::consts::PI;
use uom::si::area::square_meter;

/// Geometry seam consumed by flow nodes and coefficient correlations.
pub trait GeometryProvider: Send + Sync {
    /// Axial length of the flow path.
    fn characteristic_length(&self) -> Length;

    /// Flow cross-sectional area.
    fn area(&self) -> Area;

    fn hydraulic_diameter(&self) -> Length;

    /// Absolute wall roughness.
    fn roughness(&self) -> Length;

    /// Roughness relative to hydraulic diameter (ε/D).
    fn relative_roughness(&self) -> f64 {
        self.roughness().value / self.hydraulic_diameter().value
    }
}

/// Circular pipe: inner diameter, length and absolute wall roughness.
///
/// Immutable after construction; a leg shares one instance with all its nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryDefinition {
    diameter: Length,
    length: Length,
    roughness: Length,
}

impl GeometryDefinition {
    pub fn pipe(diameter: Length, length: Length, roughness: Length) -> TransportResult<Self> {
        check_positive(diameter.value, "pipe diameter")?;
        check_positive(length.value, "pipe length")?;
        if !roughness.value.is_finite() || roughness.value < 0.0 {
            return Err(crate::TransportError::NonPhysical {
                what: "wall roughness",
            });
        }
        Ok(Self {
            diameter,
            length,
            roughness,
        })
    }

    pub fn length(&self) -> Length {
        self.length
    }
}

impl GeometryProvider for GeometryDefinition {
    fn characteristic_length(&self) -> Length {
        self.length
    }

    fn area(&self) -> Area {
        Area::new::<square_meter>(PI * self.diameter.value.powi(2) / 4.0)
    }

    fn hydraulic_diameter(&self) -> Length {
        self.diameter
    }

    fn roughness(&self) -> Length {
        self.roughness
    }
}
