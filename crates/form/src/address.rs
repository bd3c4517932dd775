//! Thai address reference data and cross-lookup queries
//!
//! The lookup table is a fixed, read-only ordered sequence of address
//! records, loaded once per process. Postcodes are not unique (one
//! postcode covers many addresses); district and sub-district strings are
//! only unique within their parent scope.

use dynaform_schema::{DependsOn, FieldSchema, FieldValue, OptionItem, ReverseMapping};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

// ============================================================================
// AddressRecord
// ============================================================================

/// One row of the address reference dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub province: String,
    pub district: String,
    pub sub_district: String,
    pub postcode: String,
}

impl AddressRecord {
    /// Create a new record
    pub fn new(
        province: impl Into<String>,
        district: impl Into<String>,
        sub_district: impl Into<String>,
        postcode: impl Into<String>,
    ) -> Self {
        Self {
            province: province.into(),
            district: district.into(),
            sub_district: sub_district.into(),
            postcode: postcode.into(),
        }
    }
}

// ============================================================================
// AddressTable
// ============================================================================

/// Read-only address lookup table with pure queries.
///
/// All query results preserve first-seen dataset order.
#[derive(Debug, Clone)]
pub struct AddressTable {
    records: Vec<AddressRecord>,
}

impl AddressTable {
    /// Create a table over the given records
    pub fn new(records: Vec<AddressRecord>) -> Self {
        Self { records }
    }

    /// The process-wide builtin dataset, initialized once
    pub fn builtin() -> &'static AddressTable {
        static TABLE: OnceLock<AddressTable> = OnceLock::new();
        TABLE.get_or_init(|| AddressTable::new(builtin_records()))
    }

    /// All records in dataset order
    pub fn records(&self) -> &[AddressRecord] {
        &self.records
    }

    /// Unique provinces, first-seen order
    pub fn provinces(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for r in &self.records {
            if !seen.contains(&r.province.as_str()) {
                seen.push(r.province.as_str());
            }
        }
        seen
    }

    /// Unique districts of a province; empty if the province is unknown
    pub fn districts(&self, province: &str) -> Vec<&str> {
        let mut seen = Vec::new();
        for r in self.records.iter().filter(|r| r.province == province) {
            if !seen.contains(&r.district.as_str()) {
                seen.push(r.district.as_str());
            }
        }
        seen
    }

    /// Unique sub-districts of a (province, district); empty if no match
    pub fn sub_districts(&self, province: &str, district: &str) -> Vec<&str> {
        let mut seen = Vec::new();
        for r in self
            .records
            .iter()
            .filter(|r| r.province == province && r.district == district)
        {
            if !seen.contains(&r.sub_district.as_str()) {
                seen.push(r.sub_district.as_str());
            }
        }
        seen
    }

    /// All records matching a postcode exactly; empty if none
    pub fn by_postcode(&self, postcode: &str) -> Vec<&AddressRecord> {
        self.records.iter().filter(|r| r.postcode == postcode).collect()
    }

    /// The postcode of an exact (province, district, sub-district) triple.
    ///
    /// First match wins; the builtin dataset carries no duplicate triples.
    pub fn postcode_for(&self, province: &str, district: &str, sub_district: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| {
                r.province == province && r.district == district && r.sub_district == sub_district
            })
            .map(|r| r.postcode.as_str())
    }

    /// Resolve a postcode into autofill values plus the candidate records.
    ///
    /// Province is filled when every candidate shares it; district is
    /// filled when, additionally, every candidate shares it; the
    /// sub-district only when the candidates agree on it too. Anything not
    /// filled is left for the user to choose among the candidates.
    pub fn resolve_postcode(&self, postcode: &str) -> PostcodeResolution {
        let candidates: Vec<AddressRecord> =
            self.by_postcode(postcode).into_iter().cloned().collect();

        let mut resolution = PostcodeResolution {
            province: None,
            district: None,
            sub_district: None,
            candidates,
        };

        let Some(first) = resolution.candidates.first().cloned() else {
            return resolution;
        };

        let same_province = resolution.candidates.iter().all(|r| r.province == first.province);
        let same_district =
            same_province && resolution.candidates.iter().all(|r| r.district == first.district);
        let same_sub = same_district
            && resolution.candidates.iter().all(|r| r.sub_district == first.sub_district);

        if same_province {
            resolution.province = Some(first.province.clone());
        }
        if same_district {
            resolution.district = Some(first.district.clone());
        }
        if same_sub {
            resolution.sub_district = Some(first.sub_district);
        }

        resolution
    }
}

/// Autofill values derived from a postcode
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeResolution {
    /// Filled when all candidates share the province
    pub province: Option<String>,

    /// Filled when all candidates also share the district
    pub district: Option<String>,

    /// Filled when the candidates fully agree
    pub sub_district: Option<String>,

    /// Every record matching the postcode, dataset order
    pub candidates: Vec<AddressRecord>,
}

// ============================================================================
// Schema generation
// ============================================================================

/// Generate the postcode/province/district/sub-district field group for a
/// table, with narrowing maps and autofill rules derived from the data.
///
/// The sub-district reverse mapping only includes sub-district names that
/// identify a single record; ambiguous names (shared across districts)
/// cannot key a flat mapping and are resolved with
/// [`AddressTable::postcode_for`] instead.
pub fn address_schema(table: &AddressTable) -> Vec<FieldSchema> {
    let provinces = table.provinces();

    // postcode -> { province, district?, subDistrict? }
    let mut postcode_rm = ReverseMapping::new(vec![
        "province".to_string(),
        "district".to_string(),
        "subDistrict".to_string(),
    ]);
    let mut seen_postcodes: Vec<&str> = Vec::new();
    for r in table.records() {
        if seen_postcodes.contains(&r.postcode.as_str()) {
            continue;
        }
        seen_postcodes.push(&r.postcode);
        let resolution = table.resolve_postcode(&r.postcode);
        let mut fills = BTreeMap::new();
        if let Some(p) = resolution.province {
            fills.insert("province".to_string(), FieldValue::Text(p));
        }
        if let Some(d) = resolution.district {
            fills.insert("district".to_string(), FieldValue::Text(d));
        }
        if let Some(s) = resolution.sub_district {
            fills.insert("subDistrict".to_string(), FieldValue::Text(s));
        }
        postcode_rm = postcode_rm.when(r.postcode.clone(), fills);
    }

    // province -> districts
    let mut district_dep = DependsOn::new("province");
    for p in &provinces {
        let options = table.districts(p).into_iter().map(OptionItem::plain).collect();
        district_dep = district_dep.when(*p, options);
    }

    // district -> sub-districts (merged across provinces sharing a name)
    let mut sub_district_dep = DependsOn::new("district");
    let mut seen_districts: Vec<&str> = Vec::new();
    for r in table.records() {
        if seen_districts.contains(&r.district.as_str()) {
            continue;
        }
        seen_districts.push(&r.district);
        let mut options: Vec<OptionItem> = Vec::new();
        for rec in table.records().iter().filter(|x| x.district == r.district) {
            if !options.iter().any(|o| o.label == rec.sub_district) {
                options.push(OptionItem::plain(rec.sub_district.clone()));
            }
        }
        sub_district_dep = sub_district_dep.when(r.district.clone(), options);
    }

    // unambiguous sub-district -> full triple + postcode
    let mut sub_district_rm = ReverseMapping::new(vec![
        "province".to_string(),
        "district".to_string(),
        "postcode".to_string(),
    ]);
    let mut seen_subs: Vec<&str> = Vec::new();
    for r in table.records() {
        if seen_subs.contains(&r.sub_district.as_str()) {
            continue;
        }
        seen_subs.push(&r.sub_district);
        let matches: Vec<&AddressRecord> = table
            .records()
            .iter()
            .filter(|x| x.sub_district == r.sub_district)
            .collect();
        if matches.len() != 1 {
            continue;
        }
        let only = matches[0];
        let mut fills = BTreeMap::new();
        fills.insert("province".to_string(), FieldValue::Text(only.province.clone()));
        fills.insert("district".to_string(), FieldValue::Text(only.district.clone()));
        fills.insert("postcode".to_string(), FieldValue::Text(only.postcode.clone()));
        sub_district_rm = sub_district_rm.when(only.sub_district.clone(), fills);
    }

    vec![
        FieldSchema::string("postcode", "Postcode")
            .required()
            .with_span(12)
            .with_placeholder("Postcode")
            .with_reverse_mapping(postcode_rm),
        FieldSchema::select(
            "province",
            "Province",
            provinces.iter().map(|p| OptionItem::plain(*p)).collect(),
        )
        .required()
        .with_span(12)
        .with_placeholder("Select Province"),
        FieldSchema::new("district", "District", dynaform_core::FieldType::Select)
            .required()
            .with_span(12)
            .with_placeholder("Select District")
            .with_depends_on(district_dep),
        FieldSchema::new("subDistrict", "Sub-district", dynaform_core::FieldType::Select)
            .required()
            .with_span(12)
            .with_placeholder("Select Sub-district")
            .with_depends_on(sub_district_dep)
            .with_reverse_mapping(sub_district_rm),
    ]
}

/// The builtin reference dataset
fn builtin_records() -> Vec<AddressRecord> {
    vec![
        AddressRecord::new("กรุงเทพมหานคร", "เขตพระนคร", "พระบรมมหาราชวัง", "10200"),
        AddressRecord::new("กรุงเทพมหานคร", "เขตพระนคร", "วังบูรพาภิรมย์", "10200"),
        AddressRecord::new("กรุงเทพมหานคร", "เขตดุสิต", "ดุสิต", "10300"),
        AddressRecord::new("ขอนแก่น", "เมืองขอนแก่น", "ในเมือง", "40000"),
        AddressRecord::new("ขอนแก่น", "เมืองขอนแก่น", "บ้านเป็ด", "40000"),
        AddressRecord::new("ขอนแก่น", "บ้านไผ่", "บ้านไผ่", "40110"),
        AddressRecord::new("นครพนม", "เมืองนครพนม", "ในเมือง", "48000"),
        AddressRecord::new("นครพนม", "เมืองนครพนม", "หนองแสง", "48000"),
        AddressRecord::new("นครพนม", "ธาตุพนม", "ธาตุพนม", "48110"),
    ]
}

// ============================================================================
// Tests
// ============================================================================
