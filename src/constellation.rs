//! Satellite identifier classification
use gnss::prelude::{Constellation, SV};
use hifitime::TimeScale;

/// Classifies a satellite identifier (as reported by the ephemeris source)
/// from its first character. Glonass, SBAS and anything we do not know
/// about are unsupported and yield None: that satellite should be skipped.
pub fn classify(sv: &str) -> Option<Constellation> {
    match sv.chars().next()? {
        'G' => Some(Constellation::GPS),
        'E' => Some(Constellation::Galileo),
        'C' => Some(Constellation::BeiDou),
        'J' => Some(Constellation::QZSS),
        _ => None,
    }
}

/// Builds the [SV] for an identifier that [classify] accepted.
/// Returns None when the PRN digits are not readable.
pub fn satellite(sv: &str, constellation: Constellation) -> Option<SV> {
    let prn = sv.get(1..)?.trim().parse::<u8>().ok()?;
    Some(SV { constellation, prn })
}

/// Name of the record field that carries the week counter, for this
/// [Constellation]. QZSS shares the GPS week counter.
pub fn week_field_name(constellation: Constellation) -> &'static str {
    match constellation {
        Constellation::Galileo => "GALWeek",
        Constellation::BeiDou => "BDTWeek",
        _ => "GPSWeek",
    }
}

/// [TimeScale] in which resolved epochs are expressed.
/// QZSS is handled in GPST.
pub fn timescale(constellation: Constellation) -> Option<TimeScale> {
    match constellation {
        Constellation::GPS | Constellation::QZSS => Some(TimeScale::GPST),
        Constellation::Galileo => Some(TimeScale::GST),
        Constellation::BeiDou => Some(TimeScale::BDT),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("G05", Some(Constellation::GPS))]
    #[case("G32", Some(Constellation::GPS))]
    #[case("E11", Some(Constellation::Galileo))]
    #[case("C19", Some(Constellation::BeiDou))]
    #[case("J01", Some(Constellation::QZSS))]
    #[case("R03", None)]
    #[case("S23", None)]
    #[case("I09", None)]
    #[case("", None)]
    #[case("g05", None)]
    fn sv_classification(#[case] sv: &str, #[case] expected: Option<Constellation>) {
        assert_eq!(classify(sv), expected);
    }

    #[test]
    fn classification_only_depends_on_prefix() {
        for prefix in ["G", "E", "C", "J", "R", "S", "X"] {
            let expected = classify(prefix);
            for suffix in ["01", "5", "99", "xx", " 7"] {
                let sv = format!("{}{}", prefix, suffix);
                assert_eq!(classify(&sv), expected, "{} misclassified", sv);
                assert_eq!(classify(&sv), classify(&sv));
            }
        }
    }

    #[test]
    fn week_fields() {
        assert_eq!(week_field_name(Constellation::GPS), "GPSWeek");
        assert_eq!(week_field_name(Constellation::QZSS), "GPSWeek");
        assert_eq!(week_field_name(Constellation::Galileo), "GALWeek");
        assert_eq!(week_field_name(Constellation::BeiDou), "BDTWeek");
    }

    #[test]
    fn satellite_identity() {
        let sv = satellite("G05", Constellation::GPS).unwrap();
        assert_eq!(sv.constellation, Constellation::GPS);
        assert_eq!(sv.prn, 5);
        assert!(satellite("Gxx", Constellation::GPS).is_none());
        assert!(satellite("G", Constellation::GPS).is_none());
    }

    #[test]
    fn timescales() {
        assert_eq!(timescale(Constellation::QZSS), Some(TimeScale::GPST));
        assert_eq!(timescale(Constellation::Galileo), Some(TimeScale::GST));
        assert_eq!(timescale(Constellation::BeiDou), Some(TimeScale::BDT));
        assert_eq!(timescale(Constellation::Glonass), None);
    }
}
