//! Weekframe Standard Library

pub mod functions;

use weekframe_plugin::PluginRegistry;

/// Load standard library into registry
pub fn load_standard_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Week numbering
        .with_function(functions::IkeaWeekFn)
        .with_function(functions::WeekFirstDayFn)
        .with_function(functions::IsoWeekFn)
        .with_function(functions::DateComponentsFn)
        // Fiscal
        .with_function(functions::FinancialYearFn)
        // Ranges
        .with_function(functions::TimeColumnsFn)
        .with_function(functions::WhereClauseFn)
        .with_function(functions::TimeBucketFn)
        .with_function(functions::ValidateRangeFn)
}

/// Create registry with standard library
pub fn standard_registry() -> PluginRegistry {
    load_standard_library(PluginRegistry::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_contents() {
        let registry = standard_registry();
        let names: Vec<&str> = registry.function_metas().iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec![
                "date_components",
                "financial_year",
                "ikea_week",
                "iso_week",
                "time_bucket",
                "time_columns",
                "validate_range",
                "week_first_day",
                "where_clause",
            ]
        );
    }

    #[test]
    fn test_metadata_is_consistent() {
        for meta in standard_registry().function_metas() {
            assert!(meta.usage.starts_with(meta.name), "{}", meta.name);
            // Optional arguments only trail required ones
            let first_optional = meta.args.iter().position(|a| a.optional).unwrap_or(meta.args.len());
            assert!(meta.args[first_optional..].iter().all(|a| a.optional), "{}", meta.name);
            assert!(!meta.examples.is_empty(), "{}", meta.name);
        }
    }
}
