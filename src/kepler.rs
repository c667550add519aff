/// Keplerian parameters
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Keplerian {
    /// Semi major axis (m)
    pub a: f64,
    /// Eccentricity (n.a)
    pub e: f64,
    /// Inclination angle at reference time (rad)
    pub i_0: f64,
    /// Longitude of ascending node at reference time (rad)
    pub omega_0: f64,
    /// Mean anomaly at reference time (rad)
    pub m_0: f64,
    /// Argument of perigee (rad)
    pub omega: f64,
}

/// Keplerian perturbations
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Perturbations {
    /// Mean motion difference from computed value [rad.s-1]
    pub dn: f64,
    /// Inclination rate of change [rad.s-1]
    pub i_dot: f64,
    /// Right ascension rate of change [rad.s^-1]
    pub omega_dot: f64,
    /// Amplitude of sine harmonic correction term of the argument
    /// of latitude [rad]
    pub cus: f64,
    /// Amplitude of cosine harmonic correction term of the argument
    /// of latitude [rad]
    pub cuc: f64,
    /// Amplitude of sine harmonic correction term of the angle of inclination [rad]
    pub cis: f64,
    /// Amplitude of cosine harmonic correction term of the angle of inclination [rad]
    pub cic: f64,
    /// Amplitude of sine harmonic correction term of the orbit radius [m]
    pub crs: f64,
    /// Amplitude of cosine harmonic correction term of the orbit radius [m]
    pub crc: f64,
}

/// Broadcast orbit fields a record must carry, besides its week counter.
/// Names match the decoded navigation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Toe,
    Eccentricity,
    SqrtA,
    Cic,
    Crc,
    Cis,
    Crs,
    Cuc,
    Cus,
    DeltaN,
    Omega0,
    Omega,
    Io,
    OmegaDot,
    Idot,
    M0,
}

impl Field {
    /// Canonical field order, as emitted in reference vectors.
    pub const REQUIRED: [Field; 16] = [
        Field::Toe,
        Field::Eccentricity,
        Field::SqrtA,
        Field::Cic,
        Field::Crc,
        Field::Cis,
        Field::Crs,
        Field::Cuc,
        Field::Cus,
        Field::DeltaN,
        Field::Omega0,
        Field::Omega,
        Field::Io,
        Field::OmegaDot,
        Field::Idot,
        Field::M0,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Toe => "Toe",
            Self::Eccentricity => "Eccentricity",
            Self::SqrtA => "sqrtA",
            Self::Cic => "Cic",
            Self::Crc => "Crc",
            Self::Cis => "Cis",
            Self::Crs => "Crs",
            Self::Cuc => "Cuc",
            Self::Cus => "Cus",
            Self::DeltaN => "DeltaN",
            Self::Omega0 => "Omega0",
            Self::Omega => "omega",
            Self::Io => "Io",
            Self::OmegaDot => "OmegaDot",
            Self::Idot => "IDOT",
            Self::M0 => "M0",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::Field;
    use itertools::Itertools;

    #[test]
    fn field_names_are_unique() {
        assert_eq!(
            Field::REQUIRED.iter().map(|f| f.name()).unique().count(),
            Field::REQUIRED.len()
        );
    }

    #[test]
    fn field_display() {
        assert_eq!(Field::SqrtA.to_string(), "sqrtA");
        assert_eq!(Field::Omega.to_string(), "omega");
        assert_eq!(Field::Omega0.to_string(), "Omega0");
        assert_eq!(Field::Idot.to_string(), "IDOT");
    }
}
