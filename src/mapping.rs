//! Code-to-name mapping for the product hierarchy.
//!
//! Upstream exports carry 4-letter hierarchy codes; reports are written with
//! human-readable names. Substitution is whole-word only so that codes
//! embedded in longer tokens survive untouched. Humanizes output text and
//! table keys, never the data model itself.

use std::sync::OnceLock;

use regex::Regex;

use crate::aggregation::Dimension;
use crate::contribution::{ClassifiedTable, ContributionTable};

static CODE_NAMES: &[(&str, &str)] = &[
    ("ACTH", "Acute Care Therapies"),
    ("ACA3", "Acute Care Therapies Other"),
    ("ACAP", "Adjustment product Acute Care Therapies"),
    ("ACAT", "Endovascular & AT Grafts/Drains"),
    ("ATBS", "AT Biosurgery"),
    ("ATDR", "AT Drainage"),
    ("ATGR", "AT Grafts"),
    ("ATOM", "AT OEM"),
    ("ATST", "AT Covered Stents"),
    ("ATTM", "AT Thrombus Management"),
    ("ACCA", "Cardiac Assist"),
    ("CADI", "CA Disposables"),
    ("CAHW", "CA Hardware"),
    ("CAOM", "CA OEM"),
    ("CAOT", "CA Other"),
    ("CASV", "CA Service"),
    ("ACCC", "Critical Care"),
    ("CCAA", "CC Anesthesia"),
    ("CCDS", "CC Digital Solutions"),
    ("CCHD", "CC Advanced Monitoring Disposables"),
    ("CCHH", "CC Advanced Monitoring Hardware"),
    ("CCOT", "CC Other"),
    ("CCSE", "CC Service"),
    ("CCVE", "CC Ventilation"),
    ("ACCP", "Cardiopulmonary"),
    ("CPDE", "CP Disposables ECLS"),
    ("CPDS", "CP Disposables Surgical Perfusion"),
    ("CPHE", "CP Hardware ECLS"),
    ("CPHS", "CP Hardware Surgical Perfusion"),
    ("CPOT", "CP Other"),
    ("CPSE", "CP Service"),
    ("ACCS", "Cardiac Surgery"),
    ("CSAB", "CS Transmyocardial Revasculation"),
    ("CSAO", "CS Left Atrial Appendage Occlusion"),
    ("CSHB", "CS Beating Heart"),
    ("CSVH", "CS Vessel Harvesting"),
    ("ACG3", "Digital Solutions"),
    ("ACGD", "DS Advanced Clinical Guidance"),
    ("ACTC", "Transplant Care"),
    ("TCAB", "TC Abdominal"),
    ("TCSE", "TC Service"),
    ("TCTH", "TC Thoracic"),
    ("ACVI", "Vascular Interventions"),
    ("VIGA", "VI Aortic Grafts"),
    ("VIGC", "VI Peripheral Vascular Grafts (Composite)"),
    ("VIGP", "VI Peripheral Vascular Grafts (PET)"),
    ("VIOM", "VI OEM"),
    ("LISC", "Life Science"),
    ("LIA3", "Life Science Other"),
    ("LSAP", "Adjustment product Life Science"),
    ("LSBC", "BP Consumables"),
    ("LSBI", "Bio-Processing"),
    ("LSBR", "BP Bio Reactors"),
    ("LSNC", "NU Consumables"),
    ("LSNL", "Nuclear"),
    ("LSNS", "NU Service"),
    ("LSNU", "NU Nuclear"),
    ("LSSE", "LS Service (excl. NU)"),
    ("LSSV", "Service"),
    ("LSPO", "ST Ports & Containers"),
    ("LSSC", "ST Beta Bags and Consumables"),
    ("LSTR", "Sterile Transfer"),
    ("LSFC", "UDP Filling Line Consumables & Connectors"),
    ("LSFL", "UDP Filling Lines"),
    ("LSFP", "UDP Fluid Pathway"),
    ("LSPU", "UDP Pumps & Other Capital Equipment"),
    ("LSUD", "Up-stream Down-stream Processing"),
    ("LSIS", "WIS Isolation"),
    ("LSST", "WIS Sterilization"),
    ("LSWA", "WIS Washers"),
    ("LSWC", "WIS Consumables"),
    ("LSWI", "Washer / Isolator / Sterilizer"),
    ("SWIC", "Surgical Workflows"),
    ("SWA3", "Surgical Workflows Other"),
    ("SWAP", "Adjustment product Surgical Workflows"),
    ("ARJO", "Arjo products"),
    ("ARJC", "Arjo products"),
    ("SWIN", "Infection Control"),
    ("INCO", "IC Consumables"),
    ("INDI", "IC Disinfection Health Care"),
    ("INEN", "IC Endoscopy"),
    ("INLO", "IC Loading Eqpt / Automation"),
    ("INLT", "IC Low Temp Sterilization"),
    ("INSE", "IC Service"),
    ("INST", "IC Sterilization"),
    ("SWIW", "Digital Health Solutions"),
    ("IWOI", "DHS OR Integration"),
    ("IWPF", "DHS OR and Patient Flow Management"),
    ("IWSE", "DHS Service"),
    ("IWSS", "DHS Sterile Supply Management"),
    ("SWWP", "Surgical Workplaces"),
    ("WPAS", "SWP Assist Systems"),
    ("WPCD", "SWP Ceiling Devices"),
    ("WPNI", "SWP Near-Infrared Imaging"),
    ("WPOL", "SWP Operating Lights"),
    ("WPOT", "SWP Operating Tables"),
    ("WPSE", "SWP Service"),
    ("WPSO", "SWP Other"),
    ("WPVA", "SWP Modular Wall Systems"),
];

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternation = CODE_NAMES
            .iter()
            .map(|(code, _)| regex::escape(code))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\b({alternation})\b")).expect("static code pattern must compile")
    })
}

/// Looks up the human-readable name for a single hierarchy code.
pub fn product_name(code: &str) -> Option<&'static str> {
    CODE_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Replaces every whole-word occurrence of a known code in free text.
/// Unknown codes are left alone.
pub fn expand_codes(text: &str) -> String {
    code_pattern()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            match product_name(&caps[1]) {
                Some(name) => name.to_string(),
                None => caps[1].to_string(),
            }
        })
        .into_owned()
}

/// Rewrites one key column of a driver table in place.
pub fn expand_dimension_keys<T: KeyedTable>(table: &mut T, dimension: Dimension) {
    let Some(index) = table.dimensions().iter().position(|d| *d == dimension) else {
        return;
    };
    for keys in table.keys_mut() {
        keys[index] = expand_codes(&keys[index]);
    }
}

/// Access to the key columns of a grouped table, used by the mapping layer.
pub trait KeyedTable {
    fn dimensions(&self) -> &[Dimension];
    fn keys_mut(&mut self) -> impl Iterator<Item = &mut Vec<String>>;
}

impl KeyedTable for ContributionTable {
    fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    fn keys_mut(&mut self) -> impl Iterator<Item = &mut Vec<String>> {
        self.rows.iter_mut().map(|r| &mut r.keys)
    }
}

impl KeyedTable for ClassifiedTable {
    fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    fn keys_mut(&mut self) -> impl Iterator<Item = &mut Vec<String>> {
        self.rows.iter_mut().map(|r| &mut r.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contribution::{ContributionRow, ContributionTable};

    #[test]
    fn test_expands_known_codes_in_text() {
        let text = "CCVE in EMEA as main growth driver, offset by CCAA.";
        assert_eq!(
            expand_codes(text),
            "CC Ventilation in EMEA as main growth driver, offset by CC Anesthesia."
        );
    }

    #[test]
    fn test_whole_word_matching_only() {
        assert_eq!(expand_codes("XCCVE and CCVEX stay put"), "XCCVE and CCVEX stay put");
    }

    #[test]
    fn test_unknown_codes_left_alone() {
        assert_eq!(expand_codes("ZZZZ unchanged"), "ZZZZ unchanged");
    }

    #[test]
    fn test_product_name_lookup() {
        assert_eq!(product_name("LISC"), Some("Life Science"));
        assert_eq!(product_name("ZZZZ"), None);
    }

    #[test]
    fn test_expand_dimension_keys_targets_one_column() {
        let mut table = ContributionTable {
            dimensions: vec![Dimension::ProductLine, Dimension::Region],
            rows: vec![ContributionRow {
                keys: vec!["CCVE".to_string(), "EMEA".to_string()],
                total_difference: 10.0,
                contribution_pct: 100.0,
            }],
        };

        expand_dimension_keys(&mut table, Dimension::ProductLine);
        assert_eq!(table.rows[0].keys[0], "CC Ventilation");
        assert_eq!(table.rows[0].keys[1], "EMEA");
    }
}
