//! Analysis and computation configuration

/// Bounds for the number of subgroups a caller may ask for
#[derive(Debug, Clone)]
pub struct SubgroupSettings {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

/// Settings for the cluster statistics tables
#[derive(Debug, Clone)]
pub struct ClusterSettings {
    // Older outputs carried a standard deviation next to the mean
    pub include_standard_deviation: bool,
}

/// Settings for feature vector selection
#[derive(Debug, Clone)]
pub struct FeatureSettings {
    pub default_name: &'static str,
    pub max_column_index: usize,
}

/// The Master Analysis Configuration
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub subgroups: SubgroupSettings,
    pub cluster: ClusterSettings,
    pub features: FeatureSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    subgroups: SubgroupSettings {
        min: 1,
        max: 10,
        default: 2,
    },

    cluster: ClusterSettings {
        include_standard_deviation: false,
    },

    features: FeatureSettings {
        default_name: "TranFV",
        max_column_index: 1000,
    },
};

impl AnalysisConfig {
    /// Checks a requested subgroup count against the configured bounds
    pub fn validate_subgroup_count(&self, nr_subgroups: usize) -> crate::ChargeResult<()> {
        if nr_subgroups < self.subgroups.min || nr_subgroups > self.subgroups.max {
            return Err(crate::ChargeError::invalid_input(format!(
                "number of subgroups must be within {}..={}, got {}",
                self.subgroups.min, self.subgroups.max, nr_subgroups
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subgroup_bounds() {
        assert!(ANALYSIS.validate_subgroup_count(1).is_ok());
        assert!(ANALYSIS.validate_subgroup_count(10).is_ok());
        assert!(ANALYSIS.validate_subgroup_count(0).is_err());
        assert!(ANALYSIS.validate_subgroup_count(11).is_err());
    }
}
