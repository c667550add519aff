use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gnss::prelude::Constellation;
use hifitime::Epoch;

use crate::{
    kepler::{Keplerian, Perturbations},
    record::ReadyRecord,
    time::TimeResolver,
};

/// Orbital propagation failures
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    #[error("non positive semi major axis root: {0}")]
    NonPositiveSemiMajorAxis(f64),
    #[error("eccentricity {0} is not elliptical")]
    InvalidEccentricity(f64),
    #[error("kepler equation did not converge within {0} iterations")]
    KeplerNonConvergence(usize),
    #[error("non finite position")]
    NonFinitePosition,
    #[error("time of ephemeris {0}s is not within a week")]
    InvalidTimeOfEphemeris(f64),
}

/// Seconds in one week
const WEEK_SECONDS: f64 = 604800.0;

/// Everything a [Propagator] needs to determine one position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationInput {
    pub constellation: Constellation,
    pub keplerian: Keplerian,
    pub perturbations: Perturbations,
    /// Time of ephemeris, in seconds within its week
    pub toe_secs: f64,
    /// Time of ephemeris, as absolute [Epoch]
    pub toe: Epoch,
    /// Instant to propagate to
    pub epoch: Epoch,
}

impl PropagationInput {
    /// Seconds elapsed since time of ephemeris
    pub fn t_k(&self) -> f64 {
        (self.epoch - self.toe).to_seconds()
    }
}

/// Implement this trait to provide positions from keplerian elements.
pub trait Propagator {
    /// Returns ECEF position [m] at [PropagationInput] epoch
    fn propagate(&self, input: &PropagationInput) -> Result<(f64, f64, f64), Error>;
}

/// Kepler equation solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeplerSolver {
    /// Maximal number of fixed point iterations
    pub max_iterations: usize,
    /// Convergence criteria on the eccentric anomaly [rad]
    pub tolerance: f64,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            tolerance: 1.0E-10,
        }
    }
}

impl KeplerSolver {
    /// Earth mass * Gravitationnal field constant [m^3/s^2]
    pub(crate) const fn earth_gm(constellation: Constellation) -> f64 {
        match constellation {
            Constellation::Galileo | Constellation::BeiDou => 3.986004418E14_f64,
            _ => 3.9860050E14_f64,
        }
    }
    /// Earth rotation rate [rad/s]
    pub(crate) const fn earth_omega(constellation: Constellation) -> f64 {
        match constellation {
            Constellation::BeiDou => 7.292115E-5,
            _ => 7.2921151467E-5,
        }
    }
    /// Solves E = M + e sin(E)
    fn eccentric_anomaly(&self, m_k: f64, e: f64) -> Result<f64, Error> {
        let mut e_k = m_k;
        for _ in 0..self.max_iterations {
            let next = m_k + e * e_k.sin();
            if (next - e_k).abs() < self.tolerance {
                return Ok(next);
            }
            e_k = next;
        }
        Err(Error::KeplerNonConvergence(self.max_iterations))
    }
}

impl Propagator for KeplerSolver {
    fn propagate(&self, input: &PropagationInput) -> Result<(f64, f64, f64), Error> {
        let keplerian = &input.keplerian;
        let perturbations = &input.perturbations;

        if !(keplerian.a > 0.0) {
            return Err(Error::NonPositiveSemiMajorAxis(keplerian.a.sqrt()));
        }
        if !(0.0..1.0).contains(&keplerian.e) {
            return Err(Error::InvalidEccentricity(keplerian.e));
        }

        let gm = Self::earth_gm(input.constellation);
        let omega_e = Self::earth_omega(input.constellation);
        let t_k = input.t_k();

        let n0 = (gm / keplerian.a.powi(3)).sqrt();
        let n = n0 + perturbations.dn;
        let m_k = keplerian.m_0 + n * t_k;
        let e_k = self.eccentric_anomaly(m_k, keplerian.e)?;

        let (sin_e_k, cos_e_k) = e_k.sin_cos();
        let nu_k = ((1.0 - keplerian.e.powi(2)).sqrt() * sin_e_k).atan2(cos_e_k - keplerian.e);
        let phi_k = nu_k + keplerian.omega;
        let (x2_sin_phi_k, x2_cos_phi_k) = (2.0 * phi_k).sin_cos();

        let du_k = perturbations.cuc * x2_cos_phi_k + perturbations.cus * x2_sin_phi_k;
        let u_k = phi_k + du_k;

        let di_k = perturbations.cic * x2_cos_phi_k + perturbations.cis * x2_sin_phi_k;
        let i_k = keplerian.i_0 + perturbations.i_dot * t_k + di_k;

        let dr_k = perturbations.crc * x2_cos_phi_k + perturbations.crs * x2_sin_phi_k;
        let r_k = keplerian.a * (1.0 - keplerian.e * cos_e_k) + dr_k;

        let omega_k = keplerian.omega_0 + (perturbations.omega_dot - omega_e) * t_k
            - omega_e * input.toe_secs;

        let xp_k = r_k * u_k.cos();
        let yp_k = r_k * u_k.sin();

        let (sin_omega_k, cos_omega_k) = omega_k.sin_cos();
        let (sin_i_k, cos_i_k) = i_k.sin_cos();

        let x_k = xp_k * cos_omega_k - yp_k * sin_omega_k * cos_i_k;
        let y_k = xp_k * sin_omega_k + yp_k * cos_omega_k * cos_i_k;
        let z_k = yp_k * sin_i_k;

        if !(x_k.is_finite() && y_k.is_finite() && z_k.is_finite()) {
            return Err(Error::NonFinitePosition);
        }

        debug!(
            "t_k={:.3}s e_k={:.9} r_k={:.3}m -> ({:.3}, {:.3}, {:.3})",
            t_k, e_k, r_k, x_k, y_k, z_k
        );
        Ok((x_k, y_k, z_k))
    }
}

/// Converts [ReadyRecord]s to ECEF positions, delegating the orbital
/// mechanics to a [Propagator].
#[derive(Debug, Clone)]
pub struct Converter<P: Propagator> {
    resolver: TimeResolver,
    propagator: P,
}

impl<P: Propagator> Converter<P> {
    pub fn new(resolver: TimeResolver, propagator: P) -> Self {
        Self {
            resolver,
            propagator,
        }
    }
    pub fn resolver(&self) -> &TimeResolver {
        &self.resolver
    }
    /// Forms the [PropagationInput] for this record at `epoch`.
    /// Time of ephemeris must lie within its week.
    pub fn input(&self, ready: &ReadyRecord, epoch: Epoch) -> Result<PropagationInput, Error> {
        if !(0.0..=WEEK_SECONDS).contains(&ready.toe) {
            return Err(Error::InvalidTimeOfEphemeris(ready.toe));
        }
        Ok(PropagationInput {
            constellation: ready.constellation,
            keplerian: ready.keplerian,
            perturbations: ready.perturbations,
            toe_secs: ready.toe,
            toe: self.resolver.toe(ready.constellation, ready.week, ready.toe),
            epoch,
        })
    }
    /// ECEF position [m] of this record at resolved `epoch`
    pub fn to_ecef(&self, ready: &ReadyRecord, epoch: Epoch) -> Result<(f64, f64, f64), Error> {
        if !(ready.sqrt_a > 0.0) {
            return Err(Error::NonPositiveSemiMajorAxis(ready.sqrt_a));
        }
        self.propagator.propagate(&self.input(ready, epoch)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::record::{qualify_record, test::gps_record, Qualification};
    use gnss::prelude::SV;
    use hifitime::Unit;
    use rstest::rstest;
    use std::str::FromStr;

    fn norm(p: (f64, f64, f64)) -> f64 {
        (p.0.powi(2) + p.1.powi(2) + p.2.powi(2)).sqrt()
    }

    fn circular(constellation: Constellation, a: f64, dt: f64) -> PropagationInput {
        let toe = Epoch::from_str("2022-01-01T00:00:00 GPST").unwrap();
        PropagationInput {
            constellation,
            keplerian: Keplerian {
                a,
                e: 0.0,
                i_0: 0.95,
                omega_0: 1.03,
                m_0: 2.3,
                omega: -2.38,
            },
            perturbations: Perturbations::default(),
            toe_secs: 518400.0,
            toe,
            epoch: toe + dt * Unit::Second,
        }
    }

    #[rstest]
    #[case(Constellation::GPS, 26561750.0, 0.0)]
    #[case(Constellation::GPS, 26561750.0, 3600.0)]
    #[case(Constellation::Galileo, 29600318.0, 7200.0)]
    #[case(Constellation::BeiDou, 27906100.0, -1800.0)]
    #[case(Constellation::QZSS, 42164000.0, 86400.0)]
    fn circular_unperturbed_orbit(
        #[case] constellation: Constellation,
        #[case] a: f64,
        #[case] dt: f64,
    ) {
        let input = circular(constellation, a, dt);
        let position = KeplerSolver::default().propagate(&input).unwrap();
        let err = (norm(position) - a).abs();
        assert!(err < 1.0E-6, "|r| - a = {}", err);
    }

    /// 2022-01-01 broadcast of G01, at its time of ephemeris
    fn g01(dt: f64) -> PropagationInput {
        let toe = Epoch::from_str("2022-01-01T00:00:00 GPST").unwrap();
        PropagationInput {
            constellation: Constellation::GPS,
            keplerian: Keplerian {
                a: 26561110.712759566,
                e: 0.00534839148168,
                i_0: 0.957537602313,
                omega_0: 1.03791041521,
                m_0: 2.30316624652,
                omega: -2.3834050415,
            },
            perturbations: Perturbations {
                dn: 2.3949035344821167e-17,
                i_dot: 5.11807041192e-10,
                omega_dot: -8.0467641439e-09,
                cus: 6.09830021858e-06,
                cuc: 9.85339283943e-07,
                cis: -1.54599547386e-07,
                cic: -1.04308128357e-07,
                crs: 17.3125,
                crc: 258.34375,
            },
            toe_secs: 518400.0,
            toe,
            epoch: toe + dt * Unit::Second,
        }
    }

    fn assert_ecef(position: (f64, f64, f64), expected: (f64, f64, f64)) {
        let err = (
            (position.0 - expected.0).abs(),
            (position.1 - expected.1).abs(),
            (position.2 - expected.2).abs(),
        );
        assert!(err.0 < 1.0E-6, "x(ecef) error too large {}", err.0);
        assert!(err.1 < 1.0E-6, "y(ecef) error too large {}", err.1);
        assert!(err.2 < 1.0E-6, "z(ecef) error too large {}", err.2);
    }

    #[test]
    fn keplerian_orbit_single_step() {
        // E = M + e.sin(M)
        let solver = KeplerSolver {
            max_iterations: 1,
            tolerance: 1.0,
        };
        let position = solver.propagate(&g01(0.0)).unwrap();
        assert_ecef(
            position,
            (16685968.411769923, 20728763.631397538, -1574846.006229475),
        );
    }

    #[rstest]
    #[case(0.0, (16686125.47937076, 20728611.899364807, -1575153.6112306134))]
    #[case(3600.0, (14682246.081822706, 20190821.34875915, 9458614.50957757))]
    fn keplerian_orbit(#[case] dt: f64, #[case] expected: (f64, f64, f64)) {
        let input = g01(dt);
        let position = KeplerSolver::default().propagate(&input).unwrap();
        assert_ecef(position, expected);

        let e_k = KeplerSolver::default()
            .eccentric_anomaly(input.keplerian.m_0, input.keplerian.e)
            .unwrap();
        assert!((e_k - input.keplerian.e * e_k.sin() - input.keplerian.m_0).abs() < 1.0E-9);
    }

    #[test]
    fn invalid_elements() {
        let solver = KeplerSolver::default();
        let mut input = circular(Constellation::GPS, 26561750.0, 0.0);
        input.keplerian.e = 1.2;
        assert_eq!(solver.propagate(&input), Err(Error::InvalidEccentricity(1.2)));

        let mut input = circular(Constellation::GPS, 0.0, 0.0);
        input.keplerian.e = 0.01;
        assert!(matches!(
            solver.propagate(&input),
            Err(Error::NonPositiveSemiMajorAxis(_))
        ));
    }

    #[test]
    fn kepler_non_convergence() {
        let solver = KeplerSolver {
            max_iterations: 1,
            tolerance: 1.0E-15,
        };
        let mut input = circular(Constellation::GPS, 26561750.0, 0.0);
        input.keplerian.e = 0.5;
        assert_eq!(solver.propagate(&input), Err(Error::KeplerNonConvergence(1)));
    }

    #[test]
    fn converter_input() {
        let sv = SV {
            constellation: Constellation::GPS,
            prn: 1,
        };
        let ready = match qualify_record(sv, Constellation::GPS, gps_record()) {
            Qualification::Ready(ready) => ready,
            other => panic!("unexpected {:?}", other),
        };
        let converter = Converter::new(TimeResolver::default(), KeplerSolver::default());
        let epoch = Epoch::from_str("2022-01-01T01:00:00 GPST").unwrap();
        let input = converter.input(&ready, epoch).unwrap();
        assert!((input.t_k() - 3600.0).abs() < 1.0E-6);
        assert_eq!(input.toe_secs, 518400.0);
        let position = converter.to_ecef(&ready, epoch).unwrap();
        assert!((norm(position) - ready.keplerian.a).abs() < 2.0E5);

        let mut negative = (*ready).clone();
        negative.sqrt_a = -5153.7;
        assert_eq!(
            converter.to_ecef(&negative, epoch),
            Err(Error::NonPositiveSemiMajorAxis(-5153.7))
        );
    }

    #[rstest]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    #[case(-1.0)]
    #[case(604801.0)]
    #[case(1.0E300)]
    fn toe_out_of_week(#[case] toe: f64) {
        let sv = SV {
            constellation: Constellation::GPS,
            prn: 1,
        };
        let mut ready = match qualify_record(sv, Constellation::GPS, gps_record()) {
            Qualification::Ready(ready) => ready,
            other => panic!("unexpected {:?}", other),
        };
        ready.toe = toe;
        let converter = Converter::new(TimeResolver::default(), KeplerSolver::default());
        let epoch = Epoch::from_str("2022-01-01T00:00:00 GPST").unwrap();
        assert_eq!(
            converter.to_ecef(&ready, epoch),
            Err(Error::InvalidTimeOfEphemeris(toe))
        );
    }
}
