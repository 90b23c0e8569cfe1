//! ISO 3166-1 country lookup.
//!
//! Identifiers are resolved by length: two letters are an alpha-2 code,
//! three letters an alpha-3 code, anything else a country name. Matching is
//! case-insensitive; names also match the common and official aliases listed
//! in [`ALIASES`].

/// One ISO 3166-1 entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub alpha_2: &'static str,
    pub alpha_3: &'static str,
    pub name: &'static str,
}

const fn country(alpha_2: &'static str, alpha_3: &'static str, name: &'static str) -> Country {
    Country {
        alpha_2,
        alpha_3,
        name,
    }
}

/// Resolve a country identifier to its alpha-2 code.
pub fn country_code(identifier: &str) -> Option<&'static str> {
    let identifier = identifier.trim();
    let found = match identifier.chars().count() {
        0 => None,
        2 => by_alpha_2(identifier),
        3 => by_alpha_3(identifier),
        _ => by_name(identifier),
    };
    found.map(|c| c.alpha_2)
}

/// Find a country by alpha-2 code.
pub fn by_alpha_2(code: &str) -> Option<&'static Country> {
    COUNTRIES
        .iter()
        .find(|c| c.alpha_2.eq_ignore_ascii_case(code))
}

/// Find a country by alpha-3 code.
pub fn by_alpha_3(code: &str) -> Option<&'static Country> {
    COUNTRIES
        .iter()
        .find(|c| c.alpha_3.eq_ignore_ascii_case(code))
}

/// Find a country by its ISO short name or a known alias.
pub fn by_name(name: &str) -> Option<&'static Country> {
    let name = name.trim();
    COUNTRIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
                .and_then(|(_, code)| by_alpha_2(code))
        })
}

/// Common and official names that differ from the ISO short name.
pub const ALIASES: &[(&str, &str)] = &[
    ("United States of America", "US"),
    ("United Kingdom of Great Britain and Northern Ireland", "GB"),
    ("Great Britain", "GB"),
    ("England", "GB"),
    ("Scotland", "GB"),
    ("Wales", "GB"),
    ("Northern Ireland", "GB"),
    ("Russia", "RU"),
    ("Vietnam", "VN"),
    ("South Korea", "KR"),
    ("Korea", "KR"),
    ("Republic of Korea", "KR"),
    ("North Korea", "KP"),
    ("Iran", "IR"),
    ("Syria", "SY"),
    ("Laos", "LA"),
    ("Bolivia", "BO"),
    ("Venezuela", "VE"),
    ("Tanzania", "TZ"),
    ("Moldova", "MD"),
    ("Taiwan", "TW"),
    ("Czech Republic", "CZ"),
    ("Holland", "NL"),
    ("The Netherlands", "NL"),
    ("Ivory Coast", "CI"),
    ("Cote d'Ivoire", "CI"),
    ("Macedonia", "MK"),
    ("Turkey", "TR"),
    ("Swaziland", "SZ"),
    ("Cape Verde", "CV"),
    ("Micronesia", "FM"),
    ("Palestine", "PS"),
    ("Vatican", "VA"),
    ("Vatican City", "VA"),
    ("Brunei", "BN"),
    ("Burma", "MM"),
    ("East Timor", "TL"),
    ("Republic of Ireland", "IE"),
    ("Eire", "IE"),
    ("UAE", "AE"),
    ("Federal Republic of Germany", "DE"),
    ("French Republic", "FR"),
    ("Kingdom of Spain", "ES"),
    ("Italian Republic", "IT"),
    ("People's Republic of China", "CN"),
    ("Republic of India", "IN"),
];

/// ISO 3166-1 short names.
pub const COUNTRIES: &[Country] = &[
    country("AF", "AFG", "Afghanistan"),
    country("AX", "ALA", "Åland Islands"),
    country("AL", "ALB", "Albania"),
    country("DZ", "DZA", "Algeria"),
    country("AS", "ASM", "American Samoa"),
    country("AD", "AND", "Andorra"),
    country("AO", "AGO", "Angola"),
    country("AI", "AIA", "Anguilla"),
    country("AQ", "ATA", "Antarctica"),
    country("AG", "ATG", "Antigua and Barbuda"),
    country("AR", "ARG", "Argentina"),
    country("AM", "ARM", "Armenia"),
    country("AW", "ABW", "Aruba"),
    country("AU", "AUS", "Australia"),
    country("AT", "AUT", "Austria"),
    country("AZ", "AZE", "Azerbaijan"),
    country("BS", "BHS", "Bahamas"),
    country("BH", "BHR", "Bahrain"),
    country("BD", "BGD", "Bangladesh"),
    country("BB", "BRB", "Barbados"),
    country("BY", "BLR", "Belarus"),
    country("BE", "BEL", "Belgium"),
    country("BZ", "BLZ", "Belize"),
    country("BJ", "BEN", "Benin"),
    country("BM", "BMU", "Bermuda"),
    country("BT", "BTN", "Bhutan"),
    country("BO", "BOL", "Bolivia, Plurinational State of"),
    country("BQ", "BES", "Bonaire, Sint Eustatius and Saba"),
    country("BA", "BIH", "Bosnia and Herzegovina"),
    country("BW", "BWA", "Botswana"),
    country("BV", "BVT", "Bouvet Island"),
    country("BR", "BRA", "Brazil"),
    country("IO", "IOT", "British Indian Ocean Territory"),
    country("BN", "BRN", "Brunei Darussalam"),
    country("BG", "BGR", "Bulgaria"),
    country("BF", "BFA", "Burkina Faso"),
    country("BI", "BDI", "Burundi"),
    country("CV", "CPV", "Cabo Verde"),
    country("KH", "KHM", "Cambodia"),
    country("CM", "CMR", "Cameroon"),
    country("CA", "CAN", "Canada"),
    country("KY", "CYM", "Cayman Islands"),
    country("CF", "CAF", "Central African Republic"),
    country("TD", "TCD", "Chad"),
    country("CL", "CHL", "Chile"),
    country("CN", "CHN", "China"),
    country("CX", "CXR", "Christmas Island"),
    country("CC", "CCK", "Cocos (Keeling) Islands"),
    country("CO", "COL", "Colombia"),
    country("KM", "COM", "Comoros"),
    country("CG", "COG", "Congo"),
    country("CD", "COD", "Congo, The Democratic Republic of the"),
    country("CK", "COK", "Cook Islands"),
    country("CR", "CRI", "Costa Rica"),
    country("CI", "CIV", "Côte d'Ivoire"),
    country("HR", "HRV", "Croatia"),
    country("CU", "CUB", "Cuba"),
    country("CW", "CUW", "Curaçao"),
    country("CY", "CYP", "Cyprus"),
    country("CZ", "CZE", "Czechia"),
    country("DK", "DNK", "Denmark"),
    country("DJ", "DJI", "Djibouti"),
    country("DM", "DMA", "Dominica"),
    country("DO", "DOM", "Dominican Republic"),
    country("EC", "ECU", "Ecuador"),
    country("EG", "EGY", "Egypt"),
    country("SV", "SLV", "El Salvador"),
    country("GQ", "GNQ", "Equatorial Guinea"),
    country("ER", "ERI", "Eritrea"),
    country("EE", "EST", "Estonia"),
    country("SZ", "SWZ", "Eswatini"),
    country("ET", "ETH", "Ethiopia"),
    country("FK", "FLK", "Falkland Islands (Malvinas)"),
    country("FO", "FRO", "Faroe Islands"),
    country("FJ", "FJI", "Fiji"),
    country("FI", "FIN", "Finland"),
    country("FR", "FRA", "France"),
    country("GF", "GUF", "French Guiana"),
    country("PF", "PYF", "French Polynesia"),
    country("TF", "ATF", "French Southern Territories"),
    country("GA", "GAB", "Gabon"),
    country("GM", "GMB", "Gambia"),
    country("GE", "GEO", "Georgia"),
    country("DE", "DEU", "Germany"),
    country("GH", "GHA", "Ghana"),
    country("GI", "GIB", "Gibraltar"),
    country("GR", "GRC", "Greece"),
    country("GL", "GRL", "Greenland"),
    country("GD", "GRD", "Grenada"),
    country("GP", "GLP", "Guadeloupe"),
    country("GU", "GUM", "Guam"),
    country("GT", "GTM", "Guatemala"),
    country("GG", "GGY", "Guernsey"),
    country("GN", "GIN", "Guinea"),
    country("GW", "GNB", "Guinea-Bissau"),
    country("GY", "GUY", "Guyana"),
    country("HT", "HTI", "Haiti"),
    country("HM", "HMD", "Heard Island and McDonald Islands"),
    country("VA", "VAT", "Holy See (Vatican City State)"),
    country("HN", "HND", "Honduras"),
    country("HK", "HKG", "Hong Kong"),
    country("HU", "HUN", "Hungary"),
    country("IS", "ISL", "Iceland"),
    country("IN", "IND", "India"),
    country("ID", "IDN", "Indonesia"),
    country("IR", "IRN", "Iran, Islamic Republic of"),
    country("IQ", "IRQ", "Iraq"),
    country("IE", "IRL", "Ireland"),
    country("IM", "IMN", "Isle of Man"),
    country("IL", "ISR", "Israel"),
    country("IT", "ITA", "Italy"),
    country("JM", "JAM", "Jamaica"),
    country("JP", "JPN", "Japan"),
    country("JE", "JEY", "Jersey"),
    country("JO", "JOR", "Jordan"),
    country("KZ", "KAZ", "Kazakhstan"),
    country("KE", "KEN", "Kenya"),
    country("KI", "KIR", "Kiribati"),
    country("KP", "PRK", "Korea, Democratic People's Republic of"),
    country("KR", "KOR", "Korea, Republic of"),
    country("KW", "KWT", "Kuwait"),
    country("KG", "KGZ", "Kyrgyzstan"),
    country("LA", "LAO", "Lao People's Democratic Republic"),
    country("LV", "LVA", "Latvia"),
    country("LB", "LBN", "Lebanon"),
    country("LS", "LSO", "Lesotho"),
    country("LR", "LBR", "Liberia"),
    country("LY", "LBY", "Libya"),
    country("LI", "LIE", "Liechtenstein"),
    country("LT", "LTU", "Lithuania"),
    country("LU", "LUX", "Luxembourg"),
    country("MO", "MAC", "Macao"),
    country("MG", "MDG", "Madagascar"),
    country("MW", "MWI", "Malawi"),
    country("MY", "MYS", "Malaysia"),
    country("MV", "MDV", "Maldives"),
    country("ML", "MLI", "Mali"),
    country("MT", "MLT", "Malta"),
    country("MH", "MHL", "Marshall Islands"),
    country("MQ", "MTQ", "Martinique"),
    country("MR", "MRT", "Mauritania"),
    country("MU", "MUS", "Mauritius"),
    country("YT", "MYT", "Mayotte"),
    country("MX", "MEX", "Mexico"),
    country("FM", "FSM", "Micronesia, Federated States of"),
    country("MD", "MDA", "Moldova, Republic of"),
    country("MC", "MCO", "Monaco"),
    country("MN", "MNG", "Mongolia"),
    country("ME", "MNE", "Montenegro"),
    country("MS", "MSR", "Montserrat"),
    country("MA", "MAR", "Morocco"),
    country("MZ", "MOZ", "Mozambique"),
    country("MM", "MMR", "Myanmar"),
    country("NA", "NAM", "Namibia"),
    country("NR", "NRU", "Nauru"),
    country("NP", "NPL", "Nepal"),
    country("NL", "NLD", "Netherlands"),
    country("NC", "NCL", "New Caledonia"),
    country("NZ", "NZL", "New Zealand"),
    country("NI", "NIC", "Nicaragua"),
    country("NE", "NER", "Niger"),
    country("NG", "NGA", "Nigeria"),
    country("NU", "NIU", "Niue"),
    country("NF", "NFK", "Norfolk Island"),
    country("MK", "MKD", "North Macedonia"),
    country("MP", "MNP", "Northern Mariana Islands"),
    country("NO", "NOR", "Norway"),
    country("OM", "OMN", "Oman"),
    country("PK", "PAK", "Pakistan"),
    country("PW", "PLW", "Palau"),
    country("PS", "PSE", "Palestine, State of"),
    country("PA", "PAN", "Panama"),
    country("PG", "PNG", "Papua New Guinea"),
    country("PY", "PRY", "Paraguay"),
    country("PE", "PER", "Peru"),
    country("PH", "PHL", "Philippines"),
    country("PN", "PCN", "Pitcairn"),
    country("PL", "POL", "Poland"),
    country("PT", "PRT", "Portugal"),
    country("PR", "PRI", "Puerto Rico"),
    country("QA", "QAT", "Qatar"),
    country("RE", "REU", "Réunion"),
    country("RO", "ROU", "Romania"),
    country("RU", "RUS", "Russian Federation"),
    country("RW", "RWA", "Rwanda"),
    country("BL", "BLM", "Saint Barthélemy"),
    country("SH", "SHN", "Saint Helena, Ascension and Tristan da Cunha"),
    country("KN", "KNA", "Saint Kitts and Nevis"),
    country("LC", "LCA", "Saint Lucia"),
    country("MF", "MAF", "Saint Martin (French part)"),
    country("PM", "SPM", "Saint Pierre and Miquelon"),
    country("VC", "VCT", "Saint Vincent and the Grenadines"),
    country("WS", "WSM", "Samoa"),
    country("SM", "SMR", "San Marino"),
    country("ST", "STP", "Sao Tome and Principe"),
    country("SA", "SAU", "Saudi Arabia"),
    country("SN", "SEN", "Senegal"),
    country("RS", "SRB", "Serbia"),
    country("SC", "SYC", "Seychelles"),
    country("SL", "SLE", "Sierra Leone"),
    country("SG", "SGP", "Singapore"),
    country("SX", "SXM", "Sint Maarten (Dutch part)"),
    country("SK", "SVK", "Slovakia"),
    country("SI", "SVN", "Slovenia"),
    country("SB", "SLB", "Solomon Islands"),
    country("SO", "SOM", "Somalia"),
    country("ZA", "ZAF", "South Africa"),
    country("GS", "SGS", "South Georgia and the South Sandwich Islands"),
    country("SS", "SSD", "South Sudan"),
    country("ES", "ESP", "Spain"),
    country("LK", "LKA", "Sri Lanka"),
    country("SD", "SDN", "Sudan"),
    country("SR", "SUR", "Suriname"),
    country("SJ", "SJM", "Svalbard and Jan Mayen"),
    country("SE", "SWE", "Sweden"),
    country("CH", "CHE", "Switzerland"),
    country("SY", "SYR", "Syrian Arab Republic"),
    country("TW", "TWN", "Taiwan, Province of China"),
    country("TJ", "TJK", "Tajikistan"),
    country("TZ", "TZA", "Tanzania, United Republic of"),
    country("TH", "THA", "Thailand"),
    country("TL", "TLS", "Timor-Leste"),
    country("TG", "TGO", "Togo"),
    country("TK", "TKL", "Tokelau"),
    country("TO", "TON", "Tonga"),
    country("TT", "TTO", "Trinidad and Tobago"),
    country("TN", "TUN", "Tunisia"),
    country("TR", "TUR", "Türkiye"),
    country("TM", "TKM", "Turkmenistan"),
    country("TC", "TCA", "Turks and Caicos Islands"),
    country("TV", "TUV", "Tuvalu"),
    country("UG", "UGA", "Uganda"),
    country("UA", "UKR", "Ukraine"),
    country("AE", "ARE", "United Arab Emirates"),
    country("GB", "GBR", "United Kingdom"),
    country("US", "USA", "United States"),
    country("UM", "UMI", "United States Minor Outlying Islands"),
    country("UY", "URY", "Uruguay"),
    country("UZ", "UZB", "Uzbekistan"),
    country("VU", "VUT", "Vanuatu"),
    country("VE", "VEN", "Venezuela, Bolivarian Republic of"),
    country("VN", "VNM", "Viet Nam"),
    country("VG", "VGB", "Virgin Islands, British"),
    country("VI", "VIR", "Virgin Islands, U.S."),
    country("WF", "WLF", "Wallis and Futuna"),
    country("EH", "ESH", "Western Sahara"),
    country("YE", "YEM", "Yemen"),
    country("ZM", "ZMB", "Zambia"),
    country("ZW", "ZWE", "Zimbabwe"),
];
