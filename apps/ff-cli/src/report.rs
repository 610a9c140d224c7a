//! Run results as a text table or JSON.

use ff_boundary::FluxVector;
use ff_network::{FlowNode, LegBalance};
use ff_thermo::Phase;
use ff_transport::InterphaseTransportCoefficient;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    pub id: u32,
    /// [m]
    pub position: f64,
    /// [m]
    pub elevation: f64,
    pub gas_fraction: f64,
    pub correlation: String,
    /// [m²]
    pub interfacial_area: f64,
    /// Film iterations of the last solve (finite-volume boundaries only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub film_iterations: Option<usize>,
    pub flux: FluxVector,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub case: String,
    pub boundary: String,
    pub phase: Phase,
    pub components: Vec<String>,
    pub nodes: Vec<NodeReport>,
    pub balance: LegBalance,
}

impl NodeReport {
    /// Report for a solved node; `None` if it has no committed flux.
    pub fn from_node(node: &FlowNode) -> Option<Self> {
        Some(Self {
            id: node.id().index(),
            position: node.span().position.value,
            elevation: node.span().elevation.value,
            gas_fraction: node.state().gas_fraction(),
            correlation: node.coefficient_model().name().to_string(),
            interfacial_area: node.interfacial_area()?,
            film_iterations: node
                .boundary()
                .and_then(|b| b.last_report())
                .map(|r| r.iterations),
            flux: node.flux()?.clone(),
        })
    }
}

impl RunReport {
    pub fn to_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Case: {}  ({} boundary, {} side)\n",
            self.case,
            self.boundary,
            match self.phase {
                Phase::Gas => "gas",
                Phase::Liquid => "liquid",
            }
        ));

        let mut header = format!(
            "{:>4} {:>9} {:>8} {:>7} {:>5}",
            "node", "z [m]", "alpha", "a [m2]", "iter"
        );
        for name in &self.components {
            header.push_str(&format!(" {:>14}", format!("N_{name}")));
        }
        header.push_str(&format!(" {:>12}", "q [W/m2]"));
        out.push_str(&header);
        out.push('\n');

        for node in &self.nodes {
            let iterations = node
                .film_iterations
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            let mut row = format!(
                "{:>4} {:>9.4} {:>8.5} {:>7.4} {:>5}",
                node.id, node.position, node.gas_fraction, node.interfacial_area, iterations
            );
            for n in &node.flux.components {
                row.push_str(&format!(" {:>14.6e}", n));
            }
            row.push_str(&format!(" {:>12.4e}", node.flux.energy));
            out.push_str(&row);
            out.push('\n');
        }

        out.push_str(&format!(
            "Leg transfer (area {:.4} m2):\n",
            self.balance.interfacial_area
        ));
        for (name, rate) in self.components.iter().zip(&self.balance.components) {
            out.push_str(&format!("  {name:<12} {rate:>14.6e} mol/s\n"));
        }
        out.push_str(&format!("  {:<12} {:>14.6e} W\n", "energy", self.balance.energy));
        out
    }
}
