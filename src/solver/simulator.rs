//! Main solver interface.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use tracing::{debug, warn};

use super::mna::{stamp_netlist, MnaMatrix, SingularPivot};
use super::result::{NumericWarning, SimulationResult, Solution};
use super::scalar::Scalar;
use super::{DEFAULT_CONDITION_LIMIT, DEFAULT_PIVOT_TOLERANCE};
use crate::circuit::{floating_nodes, Domain, Netlist};
use crate::error::{CircuitError, Result};

/// Which scalar field to solve in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Use the netlist's own classification.
    #[default]
    Auto,
    /// Force real arithmetic; fails on phasor sources.
    Dc,
    /// Force complex arithmetic; DC values become zero-phase phasors.
    Ac,
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "dc" => Ok(Self::Dc),
            "ac" => Ok(Self::Ac),
            _ => Err(format!("unknown analysis mode '{}' (expected auto, dc or ac)", s)),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Dc => write!(f, "dc"),
            Self::Ac => write!(f, "ac"),
        }
    }
}

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Scalar field selection.
    pub mode: AnalysisMode,
    /// Relative pivot threshold below which the system is singular.
    pub pivot_tolerance: f64,
    /// Condition estimate above which a precision warning is attached.
    pub condition_limit: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Auto,
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            condition_limit: DEFAULT_CONDITION_LIMIT,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the analysis mode.
    pub fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the relative pivot tolerance.
    ///
    /// A column is singular when no candidate pivot exceeds
    /// `pivot_tolerance` times the scale of its own row.
    pub fn with_pivot_tolerance(mut self, pivot_tolerance: f64) -> Self {
        self.pivot_tolerance = pivot_tolerance;
        self
    }

    /// Set the condition estimate that triggers a precision warning.
    pub fn with_condition_limit(mut self, condition_limit: f64) -> Self {
        self.condition_limit = condition_limit;
        self
    }
}

/// Modified Nodal Analysis solver for resistor / voltage-source netlists.
///
/// Holds only configuration; every call to [`Simulator::solve`] builds and
/// discards its own matrices.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a new simulator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new simulator with custom configuration.
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Solve the netlist in the field selected by the configured mode.
    pub fn solve(&self, netlist: &Netlist) -> Result<Solution> {
        let domain = match self.config.mode {
            AnalysisMode::Auto => netlist.domain(),
            AnalysisMode::Ac => Domain::Ac,
            AnalysisMode::Dc => {
                if let Some(v) = netlist.sources().iter().find(|v| v.value.is_phasor()) {
                    return Err(CircuitError::DomainMismatch {
                        source_name: v.name.clone(),
                    });
                }
                Domain::Dc
            }
        };

        debug!(
            %domain,
            nodes = netlist.num_nodes(),
            sources = netlist.num_branches(),
            resistors = netlist.resistors().len(),
            "solving netlist"
        );

        match domain {
            Domain::Dc => self.solve_in::<f64>(netlist).map(Solution::Dc),
            Domain::Ac => self.solve_in::<Complex64>(netlist).map(Solution::Ac),
        }
    }

    /// Assemble, factor and solve over the field `T`, then derive currents.
    fn solve_in<T: Scalar>(&self, netlist: &Netlist) -> Result<SimulationResult<T>> {
        let mut matrix = MnaMatrix::<T>::new(netlist.matrix_size());
        stamp_netlist(netlist, &mut matrix);

        if let Err(SingularPivot(column)) = matrix.factor(self.config.pivot_tolerance) {
            return Err(singular_system(netlist, column));
        }
        matrix.solve();

        if let Some(index) = matrix.x.iter().position(|v| !v.is_finite()) {
            return Err(singular_system(netlist, index));
        }

        let mut warnings = Vec::new();
        let estimate = matrix.condition_estimate();
        if estimate > self.config.condition_limit {
            warn!(estimate, limit = self.config.condition_limit, "ill-conditioned MNA system");
            warnings.push(NumericWarning::IllConditioned {
                estimate,
                limit: self.config.condition_limit,
            });
        }

        let node_voltages = netlist
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| (node.clone(), matrix.x[i]))
            .collect();

        // The branch unknown flows into the + terminal; report the delivered current
        let source_currents = netlist
            .sources()
            .iter()
            .enumerate()
            .map(|(k, v)| (v.name.clone(), -matrix.x[netlist.branch_index(k)]))
            .collect();

        let resistor_currents = netlist
            .resistors()
            .iter()
            .map(|r| {
                let va = matrix.voltage(netlist.node_index(&r.nodes[0]));
                let vb = matrix.voltage(netlist.node_index(&r.nodes[1]));
                (r.name.clone(), (va - vb) / T::from_real(r.resistance))
            })
            .collect();

        Ok(SimulationResult {
            node_voltages,
            source_currents,
            resistor_currents,
            warnings,
        })
    }
}

fn singular_system(netlist: &Netlist, index: usize) -> CircuitError {
    let floating: Vec<String> = floating_nodes(netlist).iter().map(|n| n.to_string()).collect();
    let unknown = netlist.unknown_name(index);
    debug!(%unknown, ?floating, "singular MNA system");
    CircuitError::SingularSystem {
        unknown,
        floating_nodes: floating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Node;
    use crate::dsl::parse_netlist;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const DIVIDER: &str = "V1 1 0 10\nR1 1 2 1000\nR2 2 0 2000\n";
    const AC_DIVIDER: &str = "V1 1 0 15∠45\nR1 1 2 1000\nR2 2 0 2000\n";
    const BRIDGE: &str = "\
V1 1 0 12
V2 3 2 5
R1 1 2 100
R2 2 0 220
R3 3 0 330
R4 1 3 470
R5 1 0 1k
";

    fn solve(text: &str) -> Result<Solution> {
        Simulator::new().solve(&parse_netlist(text)?)
    }

    fn dc(text: &str) -> SimulationResult<f64> {
        solve(text).unwrap().as_dc().cloned().unwrap()
    }

    fn ac(text: &str) -> SimulationResult<Complex64> {
        solve(text).unwrap().as_ac().cloned().unwrap()
    }

    /// Net current leaving each non-ground node (resistors out, sources in).
    fn kcl_residuals<T: Scalar>(netlist: &Netlist, result: &SimulationResult<T>) -> Vec<f64> {
        netlist
            .nodes()
            .iter()
            .map(|node| {
                let mut sum = T::zero();
                for r in netlist.resistors() {
                    let i = result.resistor_current(&r.name).unwrap();
                    if &r.nodes[0] == node {
                        sum += i;
                    }
                    if &r.nodes[1] == node {
                        sum -= i;
                    }
                }
                for v in netlist.sources() {
                    let i = result.source_current(&v.name).unwrap();
                    if &v.nodes[0] == node {
                        sum -= i;
                    }
                    if &v.nodes[1] == node {
                        sum += i;
                    }
                }
                sum.modulus()
            })
            .collect()
    }

    #[test]
    fn test_dc_divider() {
        let r = dc(DIVIDER);
        assert_relative_eq!(r.node_voltage(&Node::Index(1)).unwrap(), 10.0, max_relative = 1e-9);
        assert_relative_eq!(r.node_voltage(&Node::Index(2)).unwrap(), 20.0 / 3.0, max_relative = 1e-9);
        assert_relative_eq!(r.source_current("V1").unwrap(), 10.0 / 3000.0, max_relative = 1e-9);
        assert_relative_eq!(r.resistor_current("R1").unwrap(), (10.0 - 20.0 / 3.0) / 1000.0, max_relative = 1e-9);
        assert_relative_eq!(r.resistor_current("R2").unwrap(), (20.0 / 3.0) / 2000.0, max_relative = 1e-9);
        assert_eq!(r.node_voltage(&Node::Ground), Some(0.0));
        assert!(r.is_well_conditioned());
    }

    #[test]
    fn test_grounded_resistors_obey_ohms_law() {
        let r = dc("V1 a 0 5\nRa a 0 250\nRb a 0 4k");
        let v = r.node_voltage(&Node::Label("a".into())).unwrap();
        assert_relative_eq!(v, 5.0, max_relative = 1e-9);
        assert_relative_eq!(r.resistor_current("Ra").unwrap(), 5.0 / 250.0, max_relative = 1e-9);
        assert_relative_eq!(r.resistor_current("Rb").unwrap(), 5.0 / 4.0e3, max_relative = 1e-9);
        assert_relative_eq!(r.source_current("V1").unwrap(), 5.0 / 250.0 + 5.0 / 4.0e3, max_relative = 1e-9);
    }

    #[test]
    fn test_ac_phasor_pass_through() {
        let r = ac(AC_DIVIDER);
        let expected = Complex64::from_polar(15.0, 45f64.to_radians());
        let v1 = r.node_voltage(&Node::Index(1)).unwrap();
        assert_abs_diff_eq!(v1.re, expected.re, epsilon = 1e-9);
        assert_abs_diff_eq!(v1.im, expected.im, epsilon = 1e-9);
        assert_abs_diff_eq!(r.node_magnitude(&Node::Index(1)).unwrap(), 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.node_phase_deg(&Node::Index(1)).unwrap(), 45.0, epsilon = 1e-9);

        // A resistive divider scales magnitude and keeps phase
        assert_abs_diff_eq!(r.node_magnitude(&Node::Index(2)).unwrap(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.node_phase_deg(&Node::Index(2)).unwrap(), 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.resistor_phase_deg("R2").unwrap(), 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.source_magnitude("V1").unwrap(), 15.0 / 3000.0, epsilon = 1e-12);
    }

    #[test]
    fn test_floating_island_is_singular() {
        let err = solve("V1 1 0 10\nR1 1 0 1k\nR2 2 3 1k").unwrap_err();
        match err {
            CircuitError::SingularSystem {
                unknown,
                floating_nodes,
            } => {
                assert!(unknown == "V(2)" || unknown == "V(3)", "unexpected unknown {}", unknown);
                assert_eq!(floating_nodes, vec!["2".to_string(), "3".to_string()]);
            }
            other => panic!("expected singular system, got {:?}", other),
        }
    }

    #[test]
    fn test_source_loop_is_singular() {
        let err = solve("V1 1 0 5\nV2 1 0 5\nR1 1 0 1k").unwrap_err();
        assert!(matches!(
            err,
            CircuitError::SingularSystem { ref unknown, ref floating_nodes }
                if unknown == "I(V2)" && floating_nodes.is_empty()
        ));
    }

    #[test]
    fn test_kcl_holds_dc() {
        let netlist = parse_netlist(BRIDGE).unwrap();
        let result = Simulator::new().solve(&netlist).unwrap();
        for residual in kcl_residuals(&netlist, result.as_dc().unwrap()) {
            assert!(residual < 1e-12, "KCL residual {}", residual);
        }
    }

    #[test]
    fn test_kcl_holds_ac() {
        let text = BRIDGE.replace("V2 3 2 5", "V2 3 2 5∠-60");
        let netlist = parse_netlist(&text).unwrap();
        let result = Simulator::new().solve(&netlist).unwrap();
        for residual in kcl_residuals(&netlist, result.as_ac().unwrap()) {
            assert!(residual < 1e-12, "KCL residual {}", residual);
        }
    }

    #[test]
    fn test_superposition_scaling() {
        let netlist = parse_netlist(&BRIDGE.replace("V2 3 2 5", "V2 3 2 5∠30")).unwrap();
        let k = 2.5;
        let base = Simulator::new().solve(&netlist).unwrap();
        let scaled = Simulator::new()
            .solve(&netlist.with_scaled_sources(k).unwrap())
            .unwrap();
        let (base, scaled) = (base.as_ac().unwrap(), scaled.as_ac().unwrap());

        let pairs = base
            .node_voltages
            .values()
            .zip(scaled.node_voltages.values())
            .chain(base.source_currents.values().zip(scaled.source_currents.values()))
            .chain(base.resistor_currents.values().zip(scaled.resistor_currents.values()));
        for (b, s) in pairs {
            assert_abs_diff_eq!(s.re, k * b.re, epsilon = 1e-9);
            assert_abs_diff_eq!(s.im, k * b.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_superposition_negative_scaling() {
        let netlist = parse_netlist(&BRIDGE.replace("V2 3 2 5", "V2 3 2 5∠30")).unwrap();
        let k = -1.5;
        let base = Simulator::new().solve(&netlist).unwrap();
        let scaled = Simulator::new()
            .solve(&netlist.with_scaled_sources(k).unwrap())
            .unwrap();
        let (base, scaled) = (base.as_ac().unwrap(), scaled.as_ac().unwrap());

        for (b, s) in base.node_voltages.values().zip(scaled.node_voltages.values()) {
            assert_abs_diff_eq!(s.re, k * b.re, epsilon = 1e-9);
            assert_abs_diff_eq!(s.im, k * b.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_solve_is_idempotent() {
        let netlist = parse_netlist(BRIDGE).unwrap();
        let sim = Simulator::new();
        let first = sim.solve(&netlist).unwrap();
        let second = sim.solve(&netlist).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_forced_ac_matches_dc() {
        let netlist = parse_netlist(DIVIDER).unwrap();
        let dc = Simulator::new().solve(&netlist).unwrap();
        let ac = Simulator::with_config(SimulatorConfig::new().with_mode(AnalysisMode::Ac))
            .solve(&netlist)
            .unwrap();
        assert_eq!(ac.domain(), Domain::Ac);
        let (dc, ac) = (dc.as_dc().unwrap(), ac.as_ac().unwrap());
        for (d, a) in dc.node_voltages.values().zip(ac.node_voltages.values()) {
            assert_abs_diff_eq!(a.re, *d, epsilon = 1e-12);
            assert_abs_diff_eq!(a.im, 0.0);
        }
    }

    #[test]
    fn test_forced_dc_rejects_phasor() {
        let netlist = parse_netlist(AC_DIVIDER).unwrap();
        let err = Simulator::with_config(SimulatorConfig::new().with_mode(AnalysisMode::Dc))
            .solve(&netlist)
            .unwrap_err();
        assert!(matches!(err, CircuitError::DomainMismatch { ref source_name } if source_name == "V1"));
    }

    #[test]
    fn test_ill_conditioned_warning() {
        let netlist = parse_netlist(DIVIDER).unwrap();
        let solution = Simulator::with_config(SimulatorConfig::new().with_condition_limit(10.0))
            .solve(&netlist)
            .unwrap();
        assert!(matches!(
            solution.warnings(),
            [NumericWarning::IllConditioned { limit, .. }] if *limit == 10.0
        ));
        // Values are still returned
        assert_relative_eq!(
            solution.as_dc().unwrap().node_voltage(&Node::Index(2)).unwrap(),
            20.0 / 3.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_wide_resistance_range_solves_with_warning() {
        let netlist = parse_netlist("V1 1 0 1\nR1 1 0 1m\nR2 1 2 100G\nR3 2 0 100G").unwrap();
        let solution = Simulator::new().solve(&netlist).unwrap();
        assert!(matches!(solution.warnings(), [NumericWarning::IllConditioned { .. }]));

        let r = solution.as_dc().unwrap();
        assert_relative_eq!(r.node_voltage(&Node::Index(2)).unwrap(), 0.5, max_relative = 1e-6);
        assert_relative_eq!(r.source_current("V1").unwrap(), 1e3, max_relative = 1e-9);
    }

    #[test]
    fn test_resistors_only_network() {
        let r = dc("R1 1 0 1k\nR2 1 2 1k\nR3 2 0 1k");
        assert_eq!(r.node_voltage(&Node::Index(1)), Some(0.0));
        assert_eq!(r.resistor_current("R2"), Some(0.0));
    }

    #[test]
    fn test_analysis_mode_from_str() {
        assert_eq!("AC".parse::<AnalysisMode>(), Ok(AnalysisMode::Ac));
        assert_eq!("auto".parse::<AnalysisMode>(), Ok(AnalysisMode::Auto));
        assert!("transient".parse::<AnalysisMode>().is_err());
    }
}
