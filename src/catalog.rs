//! Static disease information, paired across the supported languages.
//!
//! Every [`DiseaseKey`] carries one record per [`Language`], so the English
//! and Hindi tables can never drift apart in size or order.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Hindi];

    /// Value used in query strings and form fields.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    /// Accepts either the short code or the display label.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code || lang.label() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिन्दी",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Risk {
    Low,
    Moderate,
    High,
}

/// CSS class family used to colour the risk badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskStyle {
    Low,
    Medium,
    High,
}

impl RiskStyle {
    pub fn css_class(self) -> &'static str {
        match self {
            RiskStyle::Low => "risk-low",
            RiskStyle::Medium => "risk-medium",
            RiskStyle::High => "risk-high",
        }
    }
}

impl Risk {
    pub fn style(self) -> RiskStyle {
        match self {
            Risk::Low => RiskStyle::Low,
            Risk::Moderate => RiskStyle::Medium,
            Risk::High => RiskStyle::High,
        }
    }

    pub fn label(self, lang: Language) -> &'static str {
        match (self, lang) {
            (Risk::Low, Language::English) => "🟢 Low",
            (Risk::Moderate, Language::English) => "🟡 Moderate",
            (Risk::High, Language::English) => "🔴 High",
            (Risk::Low, Language::Hindi) => "🟢 कम",
            (Risk::Moderate, Language::Hindi) => "🟡 मध्यम",
            (Risk::High, Language::Hindi) => "🔴 उच्च",
        }
    }
}

/// Shared identity of a disease across languages. Declaration order is the
/// order the resolver walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiseaseKey {
    AppleScab,
    AppleBlackRot,
    Healthy,
}

impl DiseaseKey {
    pub const ALL: [DiseaseKey; 3] = [
        DiseaseKey::AppleScab,
        DiseaseKey::AppleBlackRot,
        DiseaseKey::Healthy,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseRecord {
    pub name: &'static str,
    pub about: &'static str,
    pub symptoms: &'static [&'static str],
    pub treatment: &'static [&'static str],
    pub prevention: &'static [&'static str],
    pub season: &'static str,
    pub risk: Risk,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localized {
    pub english: DiseaseRecord,
    pub hindi: DiseaseRecord,
}

impl Localized {
    pub fn get(&self, lang: Language) -> &DiseaseRecord {
        match lang {
            Language::English => &self.english,
            Language::Hindi => &self.hindi,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<DiseaseKey, Localized>,
    // never empty
    keys: Vec<DiseaseKey>,
}

impl Catalog {
    pub fn new(entries: impl IntoIterator<Item = (DiseaseKey, Localized)>) -> Result<Self> {
        let entries: BTreeMap<_, _> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        let keys = entries.keys().copied().collect();
        Ok(Catalog { entries, keys })
    }

    /// The built-in apple catalog.
    pub fn builtin() -> Self {
        Catalog {
            entries: DiseaseKey::ALL
                .into_iter()
                .map(|key| (key, builtin_entry(key)))
                .collect(),
            keys: DiseaseKey::ALL.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = DiseaseKey> + '_ {
        self.keys.iter().copied()
    }

    pub fn record(&self, key: DiseaseKey, lang: Language) -> Option<&DiseaseRecord> {
        self.entries.get(&key).map(|entry| entry.get(lang))
    }

    /// Maps a raw classifier index onto a catalog key by wrapping it around
    /// the key list. The classifier head is not trained on these labels, so
    /// this is a stand-in until a real label decoder exists.
    pub fn resolve(&self, index: usize) -> DiseaseKey {
        self.keys[index % self.keys.len()]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}

pub fn builtin_entry(key: DiseaseKey) -> Localized {
    match key {
        DiseaseKey::AppleScab => Localized {
            english: DiseaseRecord {
                name: "Apple Scab",
                about: "Fungal disease caused by Venturia inaequalis, affecting apple leaves and fruits.",
                symptoms: &[
                    "Olive-green or brown leaf spots",
                    "Cracked fruit skin and distorted shape",
                    "Premature leaf drop",
                ],
                treatment: &[
                    "Spray Mancozeb or Captan every 10–15 days",
                    "Prune infected branches",
                    "Avoid overhead irrigation",
                ],
                prevention: &[
                    "Ensure proper air circulation between trees",
                    "Avoid dense planting",
                    "Use resistant apple varieties",
                ],
                season: "High risk during spring and early summer (March–June)",
                risk: Risk::Moderate,
            },
            hindi: DiseaseRecord {
                name: "एप्पल स्कैब",
                about: "Venturia inaequalis फफूंद से होने वाला रोग, जो पत्तियों और फलों को प्रभावित करता है।",
                symptoms: &[
                    "पत्तियों पर जैतूनी या भूरे धब्बे",
                    "फलों की त्वचा पर दरारें और विकृति",
                    "संक्रमण से पत्तियाँ जल्दी झड़ जाती हैं",
                ],
                treatment: &[
                    "हर 10–15 दिन में Mancozeb या Captan का छिड़काव करें",
                    "संक्रमित शाखाएँ काटें",
                    "ऊपर से पानी देने से बचें",
                ],
                prevention: &[
                    "पेड़ों के बीच उचित दूरी रखें",
                    "घनी बागवानी से बचें",
                    "प्रतिरोधी किस्में लगाएँ",
                ],
                season: "वसंत और प्रारंभिक गर्मी (मार्च–जून) के दौरान उच्च जोखिम",
                risk: Risk::Moderate,
            },
        },
        DiseaseKey::AppleBlackRot => Localized {
            english: DiseaseRecord {
                name: "Apple Black Rot",
                about: "Caused by Botryosphaeria obtusa, leading to black leaf spots and fruit rot.",
                symptoms: &[
                    "Dark circular spots with brown margins",
                    "Mummified fruits remain on tree",
                    "Cankers on bark",
                ],
                treatment: &[
                    "Remove infected fruits and branches",
                    "Apply copper-based fungicides",
                    "Ensure airflow within canopy",
                ],
                prevention: &[
                    "Avoid pruning during wet weather",
                    "Disinfect tools after pruning",
                    "Apply protective fungicides before rainfall",
                ],
                season: "High risk during monsoon and humid periods (July–September)",
                risk: Risk::High,
            },
            hindi: DiseaseRecord {
                name: "एप्पल ब्लैक रॉट",
                about: "Botryosphaeria obtusa फफूंद से होने वाला रोग, जो पत्तियों और फलों को सड़ा देता है।",
                symptoms: &[
                    "भूरे किनारे वाले गहरे धब्बे",
                    "सूखे हुए फल पेड़ पर लटकते रहते हैं",
                    "छाल पर घाव और दरारें",
                ],
                treatment: &[
                    "संक्रमित फल और शाखाएँ हटाएँ",
                    "कॉपर फफूंदनाशी छिड़कें",
                    "पेड़ों में वायु संचार बनाए रखें",
                ],
                prevention: &[
                    "बरसात में छंटाई से बचें",
                    "उपकरणों को संक्रमणमुक्त करें",
                    "बरसात से पहले फफूंदनाशी छिड़कें",
                ],
                season: "मानसून और आर्द्र मौसम (जुलाई–सितंबर) में उच्च जोखिम",
                risk: Risk::High,
            },
        },
        DiseaseKey::Healthy => Localized {
            english: DiseaseRecord {
                name: "Healthy",
                about: "Your plant looks healthy! Keep maintaining good practices.",
                symptoms: &[
                    "Green leaves with no spots",
                    "Smooth fruit surface",
                    "No wilting or yellowing",
                ],
                treatment: &["No treatment required — continue routine care."],
                prevention: &[
                    "Use organic compost",
                    "Water plants early morning",
                    "Keep monitoring for pests",
                ],
                season: "All seasons safe 🌿",
                risk: Risk::Low,
            },
            hindi: DiseaseRecord {
                name: "संपूर्ण स्वस्थ",
                about: "आपका पौधा स्वस्थ है! 🌿",
                symptoms: &[
                    "पत्तियाँ हरी और चमकदार हैं",
                    "कोई धब्बे नहीं दिखते",
                    "फल सामान्य हैं",
                ],
                treatment: &["कोई उपचार आवश्यक नहीं।"],
                prevention: &[
                    "जैविक खाद डालें",
                    "सुबह जल्दी पानी दें",
                    "कीटों की नियमित जांच करें",
                ],
                season: "सभी मौसमों में सुरक्षित 🌿",
                risk: Risk::Low,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keys_follow_declaration_order() {
        let catalog = Catalog::builtin();
        let keys: Vec<_> = catalog.keys().collect();
        assert_eq!(keys, DiseaseKey::ALL.to_vec());
    }

    #[test]
    fn resolve_wraps_index_around_catalog() {
        let catalog = Catalog::builtin();
        let keys: Vec<_> = catalog.keys().collect();
        for index in 0..50 {
            assert_eq!(catalog.resolve(index), keys[index % keys.len()]);
        }
        assert_eq!(catalog.resolve(9), DiseaseKey::AppleScab);
        assert_eq!(catalog.resolve(7), DiseaseKey::AppleBlackRot);
        assert_eq!(catalog.resolve(usize::MAX), keys[usize::MAX % 3]);
    }

    #[test]
    fn single_entry_catalog_always_resolves_to_it() {
        let catalog = Catalog::new([(
            DiseaseKey::AppleBlackRot,
            builtin_entry(DiseaseKey::AppleBlackRot),
        )])
        .unwrap();
        for index in [0, 1, 2, 9, 1_000, usize::MAX] {
            assert_eq!(catalog.resolve(index), DiseaseKey::AppleBlackRot);
        }
    }

    #[test]
    fn partial_catalog_resolves_only_its_own_keys() {
        let catalog = Catalog::new([
            (DiseaseKey::Healthy, builtin_entry(DiseaseKey::Healthy)),
            (DiseaseKey::AppleScab, builtin_entry(DiseaseKey::AppleScab)),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.resolve(0), DiseaseKey::AppleScab);
        assert_eq!(catalog.resolve(1), DiseaseKey::Healthy);
        assert_eq!(catalog.resolve(7), DiseaseKey::Healthy);
        for index in 0..20 {
            assert_ne!(catalog.resolve(index), DiseaseKey::AppleBlackRot);
        }
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let result = Catalog::new(Vec::new());
        assert!(matches!(result, Err(Error::EmptyCatalog)));
    }

    #[test]
    fn every_key_has_both_languages() {
        let catalog = Catalog::builtin();
        for key in catalog.keys().collect::<Vec<_>>() {
            let en = catalog.record(key, Language::English).unwrap();
            let hi = catalog.record(key, Language::Hindi).unwrap();
            assert_ne!(en.name, hi.name);
            assert_eq!(en.risk, hi.risk);
            assert!(!en.symptoms.is_empty() && !hi.symptoms.is_empty());
        }
    }

    #[test]
    fn risk_style_comes_from_the_enum() {
        assert_eq!(Risk::Low.style().css_class(), "risk-low");
        assert_eq!(Risk::Moderate.style().css_class(), "risk-medium");
        assert_eq!(Risk::High.style().css_class(), "risk-high");
        assert_eq!(Risk::High.label(Language::Hindi), "🔴 उच्च");
        assert_eq!(Risk::Moderate.label(Language::English), "🟡 Moderate");
    }

    #[test]
    fn language_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("हिन्दी"), Some(Language::Hindi));
        assert_eq!(Language::from_code("English"), Some(Language::English));
        assert_eq!(Language::from_code(" hi "), Some(Language::Hindi));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::default(), Language::English);
    }
}
