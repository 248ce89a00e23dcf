//! A small embedded catalog mapping SP3/NORAD/ILRS identifiers to a common
//! satellite record, mirroring the source's bundled `satellites.json`
//! resource and `sp3_to_satellite`/`norad_to_satellite` lookup tables.
use std::collections::HashMap;
use std::sync::OnceLock;

use super::{IlrsId, NoradId, Sp3Id};
use crate::errors::CatalogError;

const CATALOG_JSON: &str = include_str!("../../data/satellites.json");

/// One entry of the embedded satellite catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogEntry {
    pub sp3_id: Sp3Id,
    pub norad_id: NoradId,
    pub ilrs_id: Option<IlrsId>,
    pub name: String,
}

#[derive(serde::Deserialize)]
struct RawEntry {
    sp3_id: String,
    norad_id: u32,
    ilrs_id: Option<String>,
    name: String,
}

fn parse_catalog() -> Vec<CatalogEntry> {
    let raw: Vec<RawEntry> =
        serde_json::from_str(CATALOG_JSON).expect("embedded satellites.json must be well-formed");

    raw.into_iter()
        .map(|r| CatalogEntry {
            sp3_id: Sp3Id::new(&r.sp3_id).expect("embedded catalog sp3_id must be valid"),
            norad_id: NoradId(r.norad_id),
            ilrs_id: r
                .ilrs_id
                .as_deref()
                .map(|s| IlrsId::new(s).expect("embedded catalog ilrs_id must be valid")),
            name: r.name,
        })
        .collect()
}

/// Inserts `entry` under `key`, rejecting a key already present rather than
/// silently letting the later entry win.
fn insert_unique<K>(map: &mut HashMap<K, CatalogEntry>, key: K, entry: CatalogEntry) -> Result<(), CatalogError>
where
    K: std::hash::Hash + Eq + std::fmt::Display,
{
    if let Some(existing) = map.insert(key, entry) {
        return Err(CatalogError::DuplicateIdentifier(existing.sp3_id.to_string()));
    }
    Ok(())
}

fn build_sp3_map(entries: &[CatalogEntry]) -> Result<HashMap<Sp3Id, CatalogEntry>, CatalogError> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        insert_unique(&mut map, entry.sp3_id.clone(), entry.clone())?;
    }
    Ok(map)
}

fn build_norad_map(entries: &[CatalogEntry]) -> Result<HashMap<NoradId, CatalogEntry>, CatalogError> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        insert_unique(&mut map, entry.norad_id, entry.clone())?;
    }
    Ok(map)
}

fn by_sp3() -> &'static HashMap<Sp3Id, CatalogEntry> {
    static TABLE: OnceLock<HashMap<Sp3Id, CatalogEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        build_sp3_map(&parse_catalog()).expect("embedded satellites.json must not declare a duplicate sp3_id")
    })
}

fn by_norad() -> &'static HashMap<NoradId, CatalogEntry> {
    static TABLE: OnceLock<HashMap<NoradId, CatalogEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        build_norad_map(&parse_catalog()).expect("embedded satellites.json must not declare a duplicate norad_id")
    })
}

/// Looks up a catalog entry by its SP3 identifier.
pub fn lookup_sp3(id: &Sp3Id) -> Result<&'static CatalogEntry, CatalogError> {
    by_sp3()
        .get(id)
        .ok_or_else(|| CatalogError::UnknownSatellite(id.to_string()))
}

/// Looks up a catalog entry by its NORAD catalog number.
pub fn lookup_norad(id: NoradId) -> Result<&'static CatalogEntry, CatalogError> {
    by_norad()
        .get(&id)
        .ok_or_else(|| CatalogError::UnknownSatellite(id.to_string()))
}
