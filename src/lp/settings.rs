//! # Layer configuration
//!
//! Toggles arrive either as typed field writes or as string key/value pairs from an outer
//! configuration surface.
use crate::lp::error::LpError;

/// Behavior toggles of the exact LP layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// Master switch; when false the layer refuses to solve.
    pub exact_enabled: bool,
    /// Verify primal feasibility of optimal solutions in rational arithmetic.
    pub check_primal_feasibility: bool,
    /// Verify dual feasibility and the objective sandwich of optimal solutions.
    pub check_dual_feasibility: bool,
    /// Validate Farkas proofs of infeasible outcomes.
    pub check_farkas: bool,
    /// Allow project-and-shift; when false only bound-shifting may certify.
    pub use_projshift: bool,
    /// Build an interior point for project-and-shift; when false an interior ray is built.
    pub use_interior_point: bool,
    /// Suppress communicating the cutoff bound to the backend.
    pub pseudoobj_cutoff_disable: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exact_enabled: true,
            check_primal_feasibility: true,
            check_dual_feasibility: true,
            check_farkas: true,
            use_projshift: true,
            use_interior_point: true,
            pseudoobj_cutoff_disable: false,
        }
    }
}

impl Settings {
    /// Set a toggle by its configuration key.
    ///
    /// # Errors
    ///
    /// When the key is not recognized or the value is not a boolean literal.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), LpError> {
        let value = match value {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(LpError::InvalidData(format!("not a boolean value: \"{other}\"")));
            },
        };

        let field = match key {
            "exact-enabled" => &mut self.exact_enabled,
            "check-primal-feas" => &mut self.check_primal_feasibility,
            "check-dual-feas" => &mut self.check_dual_feasibility,
            "check-farkas" => &mut self.check_farkas,
            "use-projshift" => &mut self.use_projshift,
            "use-interior-point" => &mut self.use_interior_point,
            "pseudoobj-cutoff-disable" => &mut self.pseudoobj_cutoff_disable,
            other => return Err(LpError::InvalidData(format!("unknown setting: \"{other}\""))),
        };
        *field = value;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Settings;

    #[test]
    fn keys_reach_their_fields() {
        let mut settings = Settings::default();

        settings.set("use-projshift", "false").unwrap();
        assert!(!settings.use_projshift);

        settings.set("pseudoobj-cutoff-disable", "1").unwrap();
        assert!(settings.pseudoobj_cutoff_disable);
    }

    #[test]
    fn unknown_keys_and_values_are_rejected() {
        let mut settings = Settings::default();

        assert!(settings.set("no-such-key", "true").is_err());
        assert!(settings.set("check-farkas", "maybe").is_err());
        assert_eq!(settings, Settings::default());
    }
}
