//! Flow legs: ordered node sequences along one pipe.

use crate::error::{NetworkError, NetworkResult};
use crate::node::{FlowNode, NodeSpan, PhaseVelocities};
use ff_boundary::FluidBoundary;
use ff_core::ids::{LegId, NodeId};
use ff_core::numeric::lerp;
use ff_core::units::{Length, m};
use ff_thermo::SystemState;
use ff_transport::GeometryDefinition;
use std::sync::Arc;
use tracing::debug;

/// A network segment owning its flow nodes.
///
/// The leg builds its nodes; advancing them (`FlowNode::solve` or
/// [`crate::calc_fluxes_parallel`]) is left to the caller.
#[derive(Debug, Clone)]
pub struct FlowLeg {
    id: LegId,
    geometry: Arc<GeometryDefinition>,
    inlet: SystemState,
    velocities: PhaseVelocities,
    inlet_elevation: Length,
    outlet_elevation: Length,
    node_count: usize,
    boundary: FluidBoundary,
    nodes: Vec<FlowNode>,
}

/// Legs are built on pipe geometry.
pub type PipeLeg = FlowLeg;

impl FlowLeg {
    /// Horizontal leg with a single node.
    pub fn new(
        id: LegId,
        geometry: Arc<GeometryDefinition>,
        inlet: SystemState,
        velocities: PhaseVelocities,
        boundary: FluidBoundary,
    ) -> Self {
        Self {
            id,
            geometry,
            inlet,
            velocities,
            inlet_elevation: m(0.0),
            outlet_elevation: m(0.0),
            node_count: 1,
            boundary,
            nodes: Vec::new(),
        }
    }

    pub fn with_node_count(mut self, node_count: usize) -> Self {
        self.node_count = node_count;
        self
    }

    pub fn with_elevation(mut self, inlet: Length, outlet: Length) -> Self {
        self.inlet_elevation = inlet;
        self.outlet_elevation = outlet;
        self
    }

    pub fn id(&self) -> LegId {
        self.id
    }

    pub fn geometry(&self) -> &Arc<GeometryDefinition> {
        &self.geometry
    }

    pub fn inlet(&self) -> &SystemState {
        &self.inlet
    }

    pub fn boundary_template(&self) -> &FluidBoundary {
        &self.boundary
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [FlowNode] {
        &mut self.nodes
    }

    /// Span of segment `i`: centered at (i + ½)·L/N with length L/N and
    /// elevation interpolated between inlet and outlet.
    fn span(&self, i: usize) -> NodeSpan {
        let n = self.node_count as f64;
        let length = self.geometry.length().value;
        let s = (i as f64 + 0.5) / n;
        NodeSpan {
            position: m(s * length),
            length: m(length / n),
            elevation: m(lerp(
                self.inlet_elevation.value,
                self.outlet_elevation.value,
                s,
            )),
        }
    }

    fn check_node_count(&self) -> NetworkResult<()> {
        if self.node_count == 0 {
            return Err(NetworkError::InvalidConfiguration {
                what: "flow leg needs at least one node",
            });
        }
        if u32::try_from(self.node_count).is_err() {
            return Err(NetworkError::InvalidConfiguration {
                what: "flow leg node count exceeds id range",
            });
        }
        Ok(())
    }

    /// Partition the leg into fresh nodes carrying a copy of the inlet state
    /// and an unsolved copy of the boundary template. Replaces existing nodes.
    pub fn create_flow_nodes(&mut self) -> NetworkResult<&[FlowNode]> {
        self.check_node_count()?;
        let nodes = (0..self.node_count)
            .map(|i| {
                FlowNode::new(
                    NodeId::from_index(i as u32),
                    Arc::clone(&self.geometry),
                    self.span(i),
                    self.inlet.clone(),
                    self.velocities,
                )
                .with_boundary(self.boundary.fresh_copy())
            })
            .collect();
        self.nodes = nodes;
        debug!(leg = %self.id, nodes = self.node_count, "created flow nodes");
        Ok(&self.nodes)
    }

    /// Partition the leg by replicating `prototype` into every segment.
    ///
    /// Each node is a deep copy of the prototype (state, velocities,
    /// boundary configuration) placed at the segment's id and span.
    pub fn create_flow_nodes_from(&mut self, prototype: &FlowNode) -> NetworkResult<&[FlowNode]> {
        self.check_node_count()?;
        if prototype.num_components() != self.inlet.num_components() {
            return Err(NetworkError::InvalidConfiguration {
                what: "prototype node component count differs from leg inlet",
            });
        }
        let nodes = (0..self.node_count)
            .map(|i| prototype.replicate(NodeId::from_index(i as u32), self.span(i)))
            .collect();
        self.nodes = nodes;
        debug!(
            leg = %self.id,
            nodes = self.node_count,
            prototype = %prototype.id(),
            "replicated flow nodes"
        );
        Ok(&self.nodes)
    }
}
