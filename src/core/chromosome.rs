//! Primary-chromosome whitelist and the numeric remapping applied to sex and
//! mitochondrial chromosomes.
//!
//! Downstream consumers of the genotype files expect `X`, `Y` and the
//! mitochondrion as `23`, `24` and `25`. Some numeric schemes place MT at 26
//! instead; the `25` used here is kept as-is because existing consumers read it.

use crate::core::types::NamingConvention;

/// Immutable description of which contigs count as primary and how they are renamed.
#[derive(Debug, Clone, Copy)]
pub struct ChromosomeScheme {
    /// Case-sensitive prefix stripped before lookup (UCSC `chr`)
    pub prefix: &'static str,
    /// Tokens accepted unchanged after the prefix is stripped
    pub primary: &'static [&'static str],
    /// Alias → canonical token
    pub aliases: &'static [(&'static str, &'static str)],
}

impl ChromosomeScheme {
    pub const HUMAN: Self = Self {
        prefix: "chr",
        primary: &[
            "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16",
            "17", "18", "19", "20", "21", "22", "23", "24", "25",
        ],
        aliases: &[("X", "23"), ("Y", "24"), ("M", "25"), ("MT", "25")],
    };

    /// Normalize a raw CHROM value into its canonical token.
    ///
    /// Returns `None` for anything outside the primary assembly (ALT contigs,
    /// decoys, unplaced scaffolds, lower-case aliases). Canonical tokens map to
    /// themselves, so normalizing twice is a no-op.
    #[must_use]
    pub fn normalize(&self, name: &str) -> Option<&'static str> {
        let stripped = name.strip_prefix(self.prefix).unwrap_or(name);

        if let Some((_, canonical)) = self.aliases.iter().find(|(alias, _)| *alias == stripped) {
            return Some(*canonical);
        }

        self.primary.iter().copied().find(|p| *p == stripped)
    }

    /// Names a canonical token may carry in a reference database using `convention`,
    /// most likely first.
    #[must_use]
    pub fn database_names(&self, canonical: &str, convention: NamingConvention) -> Vec<String> {
        let mut bare: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, c)| *c == canonical)
            .map(|(alias, _)| *alias)
            .collect();
        // MT is the NCBI spelling and the one dbSNP uses
        bare.sort_by_key(|alias| std::cmp::Reverse(alias.len()));
        bare.push(canonical);

        let ncbi: Vec<String> = bare.iter().map(|b| (*b).to_string()).collect();
        let ucsc: Vec<String> = bare.iter().map(|b| format!("{}{b}", self.prefix)).collect();

        match convention {
            NamingConvention::Ncbi => ncbi,
            NamingConvention::Ucsc => ucsc,
            NamingConvention::Mixed => ncbi.into_iter().chain(ucsc).collect(),
        }
    }
}

/// Detect the naming convention used by a set of contig names
pub fn detect_naming_convention<'a>(names: impl IntoIterator<Item = &'a str>) -> NamingConvention {
    let scheme = ChromosomeScheme::HUMAN;
    let mut has_chr_prefix = false;
    let mut has_no_prefix = false;

    for name in names {
        if scheme.normalize(name).is_some() {
            if name.starts_with(scheme.prefix) {
                has_chr_prefix = true;
            } else {
                has_no_prefix = true;
            }
        }
    }

    match (has_chr_prefix, has_no_prefix) {
        (true, false) => NamingConvention::Ucsc,
        (false, true) => NamingConvention::Ncbi,
        _ => NamingConvention::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUMAN: ChromosomeScheme = ChromosomeScheme::HUMAN;

    #[test]
    fn test_normalize_strips_prefix() {
        assert_eq!(HUMAN.normalize("chr7"), Some("7"));
        assert_eq!(HUMAN.normalize("7"), Some("7"));
        assert_eq!(HUMAN.normalize("chr22"), Some("22"));
    }

    #[test]
    fn test_normalize_remaps_sex_and_mito() {
        assert_eq!(HUMAN.normalize("chrX"), Some("23"));
        assert_eq!(HUMAN.normalize("Y"), Some("24"));
        assert_eq!(HUMAN.normalize("chrM"), Some("25"));
        assert_eq!(HUMAN.normalize("MT"), Some("25"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["chr1", "chrX", "chrY", "chrM", "MT", "22"] {
            let once = HUMAN.normalize(raw).unwrap();
            assert_eq!(HUMAN.normalize(once), Some(once), "{raw}");
        }
    }

    #[test]
    fn test_normalize_rejects_non_primary() {
        assert_eq!(HUMAN.normalize("chrUn_KN707904v1"), None);
        assert_eq!(HUMAN.normalize("chr1_KI270706v1_random"), None);
        assert_eq!(HUMAN.normalize("hs37d5"), None);
        assert_eq!(HUMAN.normalize("chr26"), None);
        assert_eq!(HUMAN.normalize("0"), None);
        // Prefix and aliases are case-sensitive
        assert_eq!(HUMAN.normalize("Chr1"), None);
        assert_eq!(HUMAN.normalize("chrx"), None);
    }

    #[test]
    fn test_database_names() {
        assert_eq!(HUMAN.database_names("7", NamingConvention::Ncbi), vec!["7"]);
        assert_eq!(
            HUMAN.database_names("23", NamingConvention::Ucsc),
            vec!["chrX", "chr23"]
        );
        assert_eq!(
            HUMAN.database_names("25", NamingConvention::Ncbi),
            vec!["MT", "M", "25"]
        );
        assert_eq!(
            HUMAN.database_names("1", NamingConvention::Mixed),
            vec!["1", "chr1"]
        );
    }

    #[test]
    fn test_detect_naming_convention() {
        assert_eq!(
            detect_naming_convention(["chr1", "chr2", "chrM", "chrUn_gl000220"]),
            NamingConvention::Ucsc
        );
        assert_eq!(
            detect_naming_convention(["1", "2", "MT", "GL000192.1"]),
            NamingConvention::Ncbi
        );
        assert_eq!(
            detect_naming_convention(["1", "chr2"]),
            NamingConvention::Mixed
        );
        assert_eq!(
            detect_naming_convention(std::iter::empty()),
            NamingConvention::Mixed
        );
    }
}
