//! Static lookup tables for callsign and aircraft type display.

/// ICAO airline designator to IATA airline code.
const AIRLINE_CODES: &[(&str, &str)] = &[
    ("AAL", "AA"),
    ("DAL", "DL"),
    ("UAL", "UA"),
    ("SWA", "WN"),
    ("JBU", "B6"),
    ("ASA", "AS"),
    ("NKS", "NK"),
    ("FFT", "F9"),
    ("BAW", "BA"),
    ("DLH", "LH"),
    ("AFR", "AF"),
    ("KLM", "KL"),
    ("IBE", "IB"),
    ("AZA", "AZ"),
    ("ANA", "NH"),
    ("JAL", "JL"),
    ("SIA", "SQ"),
    ("CPA", "CX"),
    ("QFA", "QF"),
    ("UAE", "EK"),
    ("QTR", "QR"),
    ("ETD", "EY"),
    ("ACA", "AC"),
    ("WJA", "WS"),
    ("AMX", "AM"),
    ("LAN", "LA"),
    ("AVA", "AV"),
];

/// ICAO aircraft type designator to manufacturer/model.
const AIRCRAFT_TYPES: &[(&str, &str)] = &[
    ("B738", "Boeing 737-800"),
    ("B737", "Boeing 737"),
    ("B739", "Boeing 737-900"),
    ("B38M", "Boeing 737 MAX 8"),
    ("B39M", "Boeing 737 MAX 9"),
    ("B77W", "Boeing 777-300ER"),
    ("B772", "Boeing 777-200"),
    ("B773", "Boeing 777-300"),
    ("B788", "Boeing 787-8"),
    ("B789", "Boeing 787-9"),
    ("B78X", "Boeing 787-10"),
    ("B763", "Boeing 767-300"),
    ("B764", "Boeing 767-400"),
    ("A320", "Airbus A320"),
    ("A321", "Airbus A321"),
    ("A319", "Airbus A319"),
    ("A20N", "Airbus A320neo"),
    ("A21N", "Airbus A321neo"),
    ("A339", "Airbus A330-900neo"),
    ("A333", "Airbus A330-300"),
    ("A332", "Airbus A330-200"),
    ("A359", "Airbus A350-900"),
    ("A35K", "Airbus A350-1000"),
    ("A388", "Airbus A380-800"),
    ("E75L", "Embraer E175"),
    ("E170", "Embraer E170"),
    ("E190", "Embraer E190"),
    ("CRJ9", "Bombardier CRJ-900"),
    ("CRJ7", "Bombardier CRJ-700"),
    ("DH8D", "Bombardier Dash 8 Q400"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallsignInfo {
    pub airline_code: Option<String>,
    pub flight_number: Option<String>,
    pub display_callsign: String,
}

impl CallsignInfo {
    fn passthrough(callsign: &str) -> Self {
        Self {
            airline_code: None,
            flight_number: None,
            display_callsign: callsign.to_string(),
        }
    }
}

pub fn iata_airline_code(icao: &str) -> Option<&'static str> {
    AIRLINE_CODES
        .iter()
        .find(|(code, _)| *code == icao)
        .map(|(_, iata)| *iata)
}

/// Resolves an ICAO type designator to a display name. Unmapped codes are
/// echoed back, absent codes become "Unknown".
pub fn aircraft_type_name(code: Option<&str>) -> String {
    match code {
        Some(code) => AIRCRAFT_TYPES
            .iter()
            .find(|(designator, _)| *designator == code)
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_else(|| code.to_string()),
        None => "Unknown".to_string(),
    }
}

/// Splits `^[A-Z]{3}\d+[A-Z]?$` into the ICAO prefix and the flight number.
fn split_icao_callsign(callsign: &str) -> Option<(&str, &str)> {
    if !callsign.is_ascii() || callsign.len() < 4 {
        return None;
    }
    let (prefix, number) = callsign.split_at(3);
    if !prefix.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }

    let digits = number.strip_suffix(|c: char| c.is_ascii_uppercase()).unwrap_or(number);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((prefix, number))
}

/// Normalizes a transponder callsign (e.g. `AAL123`) into its public form
/// (`AA 123`). Anything unrecognized passes through trimmed.
pub fn parse_callsign(callsign: &str) -> CallsignInfo {
    if callsign.is_empty() || callsign == "Unknown" {
        return CallsignInfo::passthrough(callsign);
    }

    let trimmed = callsign.trim();
    if let Some((icao, flight_number)) = split_icao_callsign(trimmed) {
        if let Some(iata) = iata_airline_code(icao) {
            return CallsignInfo {
                airline_code: Some(iata.to_string()),
                flight_number: Some(flight_number.to_string()),
                display_callsign: format!("{iata} {flight_number}"),
            };
        }
    }

    CallsignInfo::passthrough(trimmed)
}
