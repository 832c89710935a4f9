use std::collections::HashMap;

/// The label substitute and one-off days off are collapsed to.
pub const GENERIC_HOLIDAY: &str = "休日";

/// Static normalization rules for the holiday names of a known source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePreset {
    pub name: &'static str,
    pub replacements: &'static [(&'static str, &'static str)],
    /// Names ending with the suffix are replaced as a whole.
    pub suffixes: &'static [(&'static str, &'static str)],
}

/// Names used in the cabinet office csv file (`syukujitsu.csv`).
pub const CABINET_OFFICE: NamePreset = NamePreset {
    name: "cabinet-office",
    replacements: &[
        ("休日（祝日扱い）", GENERIC_HOLIDAY),
        ("大喪の礼", GENERIC_HOLIDAY),
        ("体育の日", "スポーツの日"),
        ("体育の日（スポーツの日）", "スポーツの日"),
    ],
    suffixes: &[],
};

/// Names produced by the built-in holiday rules.
pub const BUILTIN_JP: NamePreset = NamePreset {
    name: "builtin",
    replacements: &[
        ("振替休日", GENERIC_HOLIDAY),
        ("国民の休日", GENERIC_HOLIDAY),
        ("休日（祝日扱い）", GENERIC_HOLIDAY),
        ("天皇の即位の日", GENERIC_HOLIDAY),
        ("即位礼正殿の儀が行われる日", GENERIC_HOLIDAY),
        ("大喪の礼", GENERIC_HOLIDAY),
        ("体育の日", "スポーツの日"),
    ],
    suffixes: &[],
};

/// Names of the `jpholiday` python package, usually exported to a toml file.
pub const JPHOLIDAY: NamePreset = NamePreset {
    name: "jpholiday",
    replacements: &[
        ("皇太子・明仁親王の結婚の儀", "結婚の儀"),
        ("皇太子・皇太子徳仁親王の結婚の儀", "結婚の儀"),
        ("即位の礼正殿の儀", "即位礼正殿の儀"),
        ("即位礼正殿の儀が行われる日", GENERIC_HOLIDAY),
        ("昭和天皇の大喪の礼", GENERIC_HOLIDAY),
        ("国民の休日", GENERIC_HOLIDAY),
        ("天皇の即位の日", GENERIC_HOLIDAY),
        ("体育の日", "スポーツの日"),
    ],
    suffixes: &[("振替休日", GENERIC_HOLIDAY)],
};

pub const PRESETS: [NamePreset; 3] = [CABINET_OFFICE, BUILTIN_JP, JPHOLIDAY];

#[must_use]
pub fn preset(name: &str) -> Option<&'static NamePreset> {
    PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}

/// Maps the holiday names of one source onto canonical names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    replacements: HashMap<String, String>,
    suffixes: Vec<(String, String)>,
}

impl NameTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, name: impl Into<String>, canonical: impl Into<String>) -> &mut Self {
        self.replacements.insert(name.into(), canonical.into());
        self
    }

    pub fn suffix(&mut self, suffix: impl Into<String>, canonical: impl Into<String>) -> &mut Self {
        self.suffixes.push((suffix.into(), canonical.into()));
        self
    }

    /// Adds all rules of the preset, existing rules for the same name are replaced.
    pub fn extend_from_preset(&mut self, preset: &NamePreset) -> &mut Self {
        for (name, canonical) in preset.replacements {
            self.replace(*name, *canonical);
        }

        for (suffix, canonical) in preset.suffixes {
            self.suffix(*suffix, *canonical);
        }

        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty() && self.suffixes.is_empty()
    }

    /// Returns the canonical name, unknown names are returned unchanged.
    ///
    /// Suffix rules are checked before the exact replacements.
    #[must_use]
    pub fn normalize<'a>(&'a self, name: &'a str) -> &'a str {
        if let Some((_, canonical)) = self
            .suffixes
            .iter()
            .find(|(suffix, _)| name.ends_with(suffix.as_str()))
        {
            return canonical;
        }

        self.replacements.get(name).map_or(name, String::as_str)
    }

    /// All names the table can produce.
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.replacements
            .values()
            .chain(self.suffixes.iter().map(|(_, canonical)| canonical))
            .map(String::as_str)
    }
}

impl From<&NamePreset> for NameTable {
    fn from(preset: &NamePreset) -> Self {
        let mut result = Self::new();
        result.extend_from_preset(preset);
        result
    }
}
