//! Plain-text listing of a solution.

use std::fmt::Write;

use num_complex::Complex64;

use super::result::{SimulationResult, Solution};
use super::scalar::Scalar;
use crate::circuit::Netlist;

/// Render a solution as the human-readable result listing.
///
/// ```text
/// Simulation Mode: AC
///
/// Node Voltages:
///   V(1) = 15.0000∠45.00° V
/// ```
pub fn render(netlist: &Netlist, solution: &Solution) -> String {
    match solution {
        Solution::Dc(result) => render_with(netlist, "DC", result, |v: f64, precision| {
            format!("{:.*}", precision, v)
        }),
        Solution::Ac(result) => render_with(netlist, "AC", result, |v: Complex64, precision| {
            format!("{:.*}∠{:.2}°", precision, v.norm(), v.arg().to_degrees())
        }),
    }
}

fn render_with<T, F>(netlist: &Netlist, mode: &str, result: &SimulationResult<T>, fmt_value: F) -> String
where
    T: Scalar,
    F: Fn(T, usize) -> String,
{
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Simulation Mode: {}\n", mode);

    let _ = writeln!(out, "Node Voltages:");
    for (node, v) in &result.node_voltages {
        let _ = writeln!(out, "  V({}) = {} V", node, fmt_value(*v, 4));
    }

    let _ = writeln!(out, "\nVoltage Source Currents:");
    for (name, i) in &result.source_currents {
        let _ = writeln!(out, "  I({}) = {} A", name, fmt_value(*i, 6));
    }

    let _ = writeln!(out, "\nResistor Currents:");
    for r in netlist.resistors() {
        if let Some(i) = result.resistor_current(&r.name) {
            let _ = writeln!(
                out,
                "  I({}) = {} A (from node {} to {})",
                r.name,
                fmt_value(i, 6),
                r.nodes[0],
                r.nodes[1]
            );
        }
    }

    if !result.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for w in &result.warnings {
            let _ = writeln!(out, "  {}", w);
        }
    }

    out
}
