use crate::prelude::Vector3;
use serde::{Deserialize, Serialize};

/// MOJN (Denmark) surveyed position, ECEF [m]
const MOJN_ECEF: (f64, f64, f64) = (3628427.9118, 562059.0936, 5197872.2150);

/// Fixed ground reference, reported alongside each entry.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct ReferencePosition {
    /// ECEF coordinates in meters
    ecef: Vector3<f64>,
}

impl ReferencePosition {
    /// Returns coordinates in ECEF [m]
    pub fn ecef(&self) -> Vector3<f64> {
        self.ecef
    }
    /// Returns coordinates in ECEF [m], as tuple
    pub fn ecef_tuple(&self) -> (f64, f64, f64) {
        (self.ecef[0], self.ecef[1], self.ecef[2])
    }
    /// Builds Self from ECEF position [m]
    pub fn from_ecef(ecef: Vector3<f64>) -> Self {
        Self { ecef }
    }
}

impl From<(f64, f64, f64)> for ReferencePosition {
    fn from(ecef: (f64, f64, f64)) -> Self {
        Self::from_ecef(Vector3::new(ecef.0, ecef.1, ecef.2))
    }
}

/// One known site: any file name containing `pattern` uses `ecef`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownPosition {
    pub pattern: String,
    /// ECEF [m]
    pub ecef: (f64, f64, f64),
}

/// Reference position lookup, by file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencePositions {
    /// Known sites, first match wins
    pub known: Vec<KnownPosition>,
    /// Used when no known site matches, ECEF [m]
    pub fallback: (f64, f64, f64),
}

impl Default for ReferencePositions {
    fn default() -> Self {
        Self {
            known: vec![KnownPosition {
                pattern: "MOJN00DNK_R_20201770000_01D_MN.rnx".to_string(),
                ecef: MOJN_ECEF,
            }],
            fallback: MOJN_ECEF,
        }
    }
}

impl ReferencePositions {
    /// [ReferencePosition] to report for this file
    pub fn lookup(&self, filename: &str) -> ReferencePosition {
        self.known
            .iter()
            .find(|known| filename.contains(&known.pattern))
            .map(|known| ReferencePosition::from(known.ecef))
            .unwrap_or_else(|| ReferencePosition::from(self.fallback))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup_by_substring() {
        let table = ReferencePositions {
            known: vec![
                KnownPosition {
                    pattern: "ESBC".to_string(),
                    ecef: (1.0, 2.0, 3.0),
                },
                KnownPosition {
                    pattern: "MOJN".to_string(),
                    ecef: (4.0, 5.0, 6.0),
                },
            ],
            fallback: (7.0, 8.0, 9.0),
        };
        assert_eq!(table.lookup("ESBC00DNK_R_2020.csv").ecef_tuple(), (1.0, 2.0, 3.0));
        assert_eq!(table.lookup("MOJN00DNK.csv").ecef_tuple(), (4.0, 5.0, 6.0));
        assert_eq!(table.lookup("AMEL00NLD.csv").ecef_tuple(), (7.0, 8.0, 9.0));
    }

    #[test]
    fn default_table() {
        let table = ReferencePositions::default();
        let pos = table.lookup("V3/MOJN00DNK_R_20201770000_01D_MN.rnx.csv");
        assert_eq!(pos.ecef(), Vector3::new(3628427.9118, 562059.0936, 5197872.2150));
        assert_eq!(table.lookup("unknown.csv").ecef_tuple(), MOJN_ECEF);
    }
}
