use serde::Deserialize;
use thiserror::Error;

/// Constants driving the mass-transfer rule.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlowParams {
    /// Downward pull per step, in fill units.
    pub gravity: f64,
    /// Fraction of a fill difference moved per step by spreading and diffusion.
    pub flow_rate: f64,
    /// Upper bound on the pressure of a single cell.
    pub max_pressure: f64,
    /// Transfers at or below this amount are discarded.
    pub min_flow: f64,
    /// Per-step velocity decay factor.
    pub damping: f64,
    pub vertical_flow_multiplier: f64,
    pub horizontal_flow_multiplier: f64,
}

impl FlowParams {
    /// Largest amount moved downward out of one cell in a single step.
    #[inline]
    pub fn vertical_cap(&self) -> f64 {
        self.gravity * self.vertical_flow_multiplier
    }

    /// Checks that every constant is finite and non-negative, and that `damping` lies in
    /// `[0, 1]`. A grid stepped with params that fail this check can end up with negative
    /// fills.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let fields = [
            ("gravity", self.gravity),
            ("flow_rate", self.flow_rate),
            ("max_pressure", self.max_pressure),
            ("min_flow", self.min_flow),
            ("damping", self.damping),
            ("vertical_flow_multiplier", self.vertical_flow_multiplier),
            ("horizontal_flow_multiplier", self.horizontal_flow_multiplier),
        ];

        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite { name, value });
            }
            if value < 0.0 {
                return Err(ParamsError::Negative { name, value });
            }
        }

        if self.damping > 1.0 {
            return Err(ParamsError::Damping(self.damping));
        }

        Ok(())
    }
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            gravity: 0.15,
            flow_rate: 0.08,
            max_pressure: 2.0,
            min_flow: 0.01,
            damping: 0.9,
            vertical_flow_multiplier: 1.1,
            horizontal_flow_multiplier: 0.6,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("damping must lie in [0, 1], got {0}")]
    Damping(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(FlowParams::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_negative_and_non_finite_values() {
        let params = FlowParams { min_flow: -1.0, ..Default::default() };
        assert_eq!(params.validate(), Err(ParamsError::Negative { name: "min_flow", value: -1.0 }));

        let params = FlowParams { flow_rate: f64::NAN, ..Default::default() };
        assert!(matches!(params.validate(), Err(ParamsError::NotFinite { name: "flow_rate", .. })));

        let params = FlowParams { max_pressure: f64::INFINITY, ..Default::default() };
        assert!(matches!(params.validate(), Err(ParamsError::NotFinite { name: "max_pressure", .. })));
    }

    #[test]
    fn damping_is_a_fraction() {
        let params = FlowParams { damping: 1.5, ..Default::default() };
        assert_eq!(params.validate(), Err(ParamsError::Damping(1.5)));

        let params = FlowParams { damping: 1.0, ..Default::default() };
        assert_eq!(params.validate(), Ok(()));

        let params = FlowParams { damping: 0.0, ..Default::default() };
        assert_eq!(params.validate(), Ok(()));
    }
}
