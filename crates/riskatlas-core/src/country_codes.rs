//! ISO 3166 alpha-2 / alpha-3 mapping for the countries the dashboard tracks.
//!
//! The API identifies countries by alpha-2 code while country outline data is
//! keyed by alpha-3, so the map needs both directions.

/// `(alpha-2, alpha-3)` pairs.
pub const COUNTRY_CODES: &[(&str, &str)] = &[
    ("US", "USA"),
    ("CN", "CHN"),
    ("DE", "DEU"),
    ("BR", "BRA"),
    ("IN", "IND"),
    ("RU", "RUS"),
    ("JP", "JPN"),
    ("SA", "SAU"),
    ("VN", "VNM"),
    ("MX", "MEX"),
    ("TH", "THA"),
    ("TW", "TWN"),
    ("KR", "KOR"),
    ("GB", "GBR"),
    ("FR", "FRA"),
    ("CA", "CAN"),
    ("AU", "AUS"),
    ("SG", "SGP"),
    ("AE", "ARE"),
    ("ID", "IDN"),
    ("ZA", "ZAF"),
    ("IT", "ITA"),
    ("ES", "ESP"),
    ("NL", "NLD"),
    ("AR", "ARG"),
    ("TR", "TUR"),
    ("MY", "MYS"),
    ("CH", "CHE"),
    ("NO", "NOR"),
    ("SE", "SWE"),
    ("PL", "POL"),
    ("UA", "UKR"),
    ("BE", "BEL"),
    ("PT", "PRT"),
    ("PH", "PHL"),
    ("PK", "PAK"),
    ("BD", "BGD"),
    ("IL", "ISR"),
    ("NZ", "NZL"),
    ("CL", "CHL"),
    ("CO", "COL"),
    ("PE", "PER"),
    ("NG", "NGA"),
    ("EG", "EGY"),
    ("KE", "KEN"),
    ("MA", "MAR"),
    ("FI", "FIN"),
    ("DK", "DNK"),
    ("AT", "AUT"),
    ("GR", "GRC"),
    ("CZ", "CZE"),
    ("RO", "ROU"),
    ("KZ", "KAZ"),
    ("LK", "LKA"),
    ("KH", "KHM"),
    ("MN", "MNG"),
    ("PA", "PAN"),
    ("CR", "CRI"),
    ("EC", "ECU"),
    ("UY", "URY"),
    ("GH", "GHA"),
    ("ET", "ETH"),
    ("QA", "QAT"),
    ("KW", "KWT"),
    ("OM", "OMN"),
    ("JO", "JOR"),
];

/// Looks up the alpha-3 code for an alpha-2 code.
pub fn iso2_to_iso3(code: &str) -> Option<&'static str> {
    COUNTRY_CODES
        .iter()
        .find(|(iso2, _)| iso2.eq_ignore_ascii_case(code))
        .map(|(_, iso3)| *iso3)
}

/// Looks up the alpha-2 code for an alpha-3 code.
pub fn iso3_to_iso2(code: &str) -> Option<&'static str> {
    COUNTRY_CODES
        .iter()
        .find(|(_, iso3)| iso3.eq_ignore_ascii_case(code))
        .map(|(iso2, _)| *iso2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_both_directions() {
        assert_eq!(iso2_to_iso3("US"), Some("USA"));
        assert_eq!(iso3_to_iso2("VNM"), Some("VN"));
        assert_eq!(iso2_to_iso3("jo"), Some("JOR"));
        assert_eq!(iso3_to_iso2("gbr"), Some("GB"));
        assert_eq!(iso2_to_iso3("ZZ"), None);
        assert_eq!(iso3_to_iso2("ATA"), None);
    }

    #[test]
    fn test_table_is_a_bijection() {
        let iso2: HashSet<_> = COUNTRY_CODES.iter().map(|(a, _)| a).collect();
        let iso3: HashSet<_> = COUNTRY_CODES.iter().map(|(_, b)| b).collect();
        assert_eq!(COUNTRY_CODES.len(), 66);
        assert_eq!(iso2.len(), COUNTRY_CODES.len());
        assert_eq!(iso3.len(), COUNTRY_CODES.len());

        for (a, b) in COUNTRY_CODES {
            assert_eq!(iso3_to_iso2(iso2_to_iso3(a).unwrap()), Some(*a));
            assert_eq!(iso2_to_iso3(iso3_to_iso2(b).unwrap()), Some(*b));
        }
    }
}
