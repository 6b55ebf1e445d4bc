//! Static reference table for synthetic lab tests.
//!
//! Each profile carries the clinical reference range reported to clients
//! plus two Gaussian populations the generator samples from: a "normal"
//! population centred inside the range and an "abnormal" one outside it.
//! The table is immutable and ordered; the full panel and every listing
//! follow this order.

use serde::Serialize;

/// Mean and standard deviation of one sampling population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gaussian {
    pub mean: f64,
    pub std_dev: f64,
}

/// Reference data and sampling model for one lab test type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestProfile {
    pub test_type: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub normal: Gaussian,
    pub abnormal: Gaussian,
}

const fn profile(
    test_type: &'static str,
    unit: &'static str,
    (min, max): (f64, f64),
    (normal_mean, normal_std): (f64, f64),
    (abnormal_mean, abnormal_std): (f64, f64),
) -> TestProfile {
    TestProfile {
        test_type,
        unit,
        min,
        max,
        normal: Gaussian { mean: normal_mean, std_dev: normal_std },
        abnormal: Gaussian { mean: abnormal_mean, std_dev: abnormal_std },
    }
}

/// Every supported test, in panel order.
pub static PANEL: [TestProfile; 7] = [
    profile("hba1c", "%", (4.0, 5.6), (5.2, 0.3), (7.5, 1.5)),
    profile("cholesterol_total", "mg/dL", (0.0, 200.0), (180.0, 20.0), (260.0, 40.0)),
    profile("cholesterol_ldl", "mg/dL", (0.0, 100.0), (90.0, 15.0), (150.0, 30.0)),
    profile("cholesterol_hdl", "mg/dL", (40.0, 60.0), (55.0, 10.0), (35.0, 8.0)),
    profile("crp", "mg/L", (0.0, 3.0), (1.0, 0.5), (8.0, 3.0)),
    profile("glucose_fasting", "mg/dL", (70.0, 100.0), (90.0, 8.0), (140.0, 30.0)),
    profile("triglycerides", "mg/dL", (0.0, 150.0), (100.0, 25.0), (220.0, 50.0)),
];

/// Find the profile for a test type. Matching is exact (case-sensitive).
pub fn lookup(test_type: &str) -> Option<&'static TestProfile> {
    PANEL.iter().find(|p| p.test_type == test_type)
}

/// Names of all supported test types, in panel order.
pub fn test_names() -> Vec<&'static str> {
    PANEL.iter().map(|p| p.test_type).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_has_seven_tests_in_order() {
        assert_eq!(
            test_names(),
            vec![
                "hba1c",
                "cholesterol_total",
                "cholesterol_ldl",
                "cholesterol_hdl",
                "crp",
                "glucose_fasting",
                "triglycerides",
            ]
        );
    }

    #[test]
    fn hba1c_profile_values() {
        let p = lookup("hba1c").unwrap();
        assert_eq!(p.unit, "%");
        assert_eq!((p.min, p.max), (4.0, 5.6));
        assert_eq!(p.normal, Gaussian { mean: 5.2, std_dev: 0.3 });
        assert_eq!(p.abnormal, Gaussian { mean: 7.5, std_dev: 1.5 });
    }

    #[test]
    fn hdl_abnormal_population_sits_below_range() {
        let p = lookup("cholesterol_hdl").unwrap();
        assert!(p.abnormal.mean < p.min);
        assert!(p.normal.mean >= p.min && p.normal.mean <= p.max);
    }

    #[test]
    fn every_profile_has_positive_spread() {
        for p in &PANEL {
            assert!(p.normal.std_dev > 0.0, "{}", p.test_type);
            assert!(p.abnormal.std_dev > 0.0, "{}", p.test_type);
            assert!(p.min <= p.max, "{}", p.test_type);
        }
    }

    #[test]
    fn lookup_unknown_and_case_mismatch() {
        assert!(lookup("cholesterol").is_none());
        assert!(lookup("HBA1C").is_none());
        assert!(lookup("").is_none());
    }
}
