//! Address → zone code, by state-abbreviation substring.
//!
//! Groups are tried in a fixed order and the first hit wins, so an address
//! containing tokens of two groups resolves to the earlier group. The order
//! also decides the detention-pay time basis; keep it as is.

use crate::models::zone::ZoneCode;

const ZONE_TABLE: [(ZoneCode, &[&str]); 4] = [
    (ZoneCode::Cst, &["TX", "IL", "CO"]),
    (ZoneCode::Est, &["PA", "NY", "GA"]),
    (ZoneCode::Pst, &["CA", "WA", "OR"]),
    (ZoneCode::Mst, &["AZ", "UT"]),
];

const DEFAULT_ZONE: ZoneCode = ZoneCode::Est;

pub fn resolve(address: &str) -> ZoneCode {
    ZONE_TABLE
        .iter()
        .find(|(_, states)| states.iter().any(|state| address.contains(state)))
        .map_or(DEFAULT_ZONE, |(zone, _)| *zone)
}
