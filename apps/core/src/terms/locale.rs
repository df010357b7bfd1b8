//! Per-language label and keyword tables used by the extraction passes.

/// Localized labels for the date subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLabels {
    pub important: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    pub due: &'static str,
    pub update: &'static str,
}

const EN_DATE_LABELS: DateLabels = DateLabels {
    important: "Important Date",
    start: "Start Date",
    end: "End Date",
    due: "Due Date",
    update: "Update Date",
};

static DATE_LABELS: &[(&str, DateLabels)] = &[
    ("en", EN_DATE_LABELS),
    (
        "de",
        DateLabels {
            important: "Wichtige Daten",
            start: "Anfangsdatum",
            end: "Enddatum",
            due: "Fälligkeitsdatum",
            update: "Aktualisierungsdatum",
        },
    ),
    (
        "es",
        DateLabels {
            important: "Fecha Importante",
            start: "Fecha de Inicio",
            end: "Fecha de Fin",
            due: "Fecha de Vencimiento",
            update: "Fecha de Actualización",
        },
    ),
    (
        "fr",
        DateLabels {
            important: "Date Importante",
            start: "Date de Début",
            end: "Date de Fin",
            due: "Date d'Échéance",
            update: "Date de Mise à Jour",
        },
    ),
    (
        "hi",
        DateLabels {
            important: "महत्वपूर्ण तिथि",
            start: "प्रारंभ तिथि",
            end: "समाप्ति तिथि",
            due: "नियत तिथि",
            update: "अद्यतन तिथि",
        },
    ),
    (
        "bn",
        DateLabels {
            important: "গুরুত্বপূর্ণ তারিখ",
            start: "শুরুর তারিখ",
            end: "শেষের তারিখ",
            due: "পরিশোধের তারিখ",
            update: "আপডেট তারিখ",
        },
    ),
    (
        "te",
        DateLabels {
            important: "ముఖ్యమైన తేదీ",
            start: "ప్రారంభ తేదీ",
            end: "ముగింపు తేదీ",
            due: "గడువు తేదీ",
            update: "నవీకరణ తేదీ",
        },
    ),
    (
        "mr",
        DateLabels {
            important: "महत्वाची तारीख",
            start: "प्रारंभ तारीख",
            end: "समाप्ती तारीख",
            due: "देय तारीख",
            update: "अद्ययावत तारीख",
        },
    ),
    (
        "ta",
        DateLabels {
            important: "முக்கிய தேதி",
            start: "தொடக்க தேதி",
            end: "முடிவு தேதி",
            due: "கெடு தேதி",
            update: "புதுப்பிப்பு தேதி",
        },
    ),
    (
        "ur",
        DateLabels {
            important: "اہم تاریخ",
            start: "آغاز کی تاریخ",
            end: "اختتام کی تاریخ",
            due: "واجب الادا تاریخ",
            update: "تازہ کاری کی تاریخ",
        },
    ),
    (
        "gu",
        DateLabels {
            important: "મહત્વપૂર્ણ તારીખ",
            start: "પ્રારંભ તારીખ",
            end: "સમાપ્તિ તારીખ",
            due: "નિયત તારીખ",
            update: "અપડેટ તારીખ",
        },
    ),
    (
        "kn",
        DateLabels {
            important: "ಪ್ರಮುಖ ದಿನಾಂಕ",
            start: "ಪ್ರಾರಂಭ ದಿನಾಂಕ",
            end: "ಮುಕ್ತಾಯ ದಿನಾಂಕ",
            due: "ಗಡುವು ದಿನಾಂಕ",
            update: "ನವೀಕರಣ ದಿನಾಂಕ",
        },
    ),
    (
        "ml",
        DateLabels {
            important: "പ്രധാന തീയതി",
            start: "ആരംഭ തീയതി",
            end: "അവസാന തീയതി",
            due: "അടയ്‌ക്കേണ്ട തീയതി",
            update: "അപ്‌ഡേറ്റ് തീയതി",
        },
    ),
    (
        "pa",
        DateLabels {
            important: "ਮਹੱਤਵਪੂਰਨ ਮਿਤੀ",
            start: "ਸ਼ੁਰੂਆਤੀ ਮਿਤੀ",
            end: "ਸਮਾਪਤੀ ਮਿਤੀ",
            due: "ਨਿਯਤ ਮਿਤੀ",
            update: "ਅਪਡੇਟ ਮਿਤੀ",
        },
    ),
    (
        "or",
        DateLabels {
            important: "ଗୁରୁତ୍ୱପୂର୍ଣ୍ଣ ତାରିଖ",
            start: "ଆରମ୍ଭ ତାରିଖ",
            end: "ଶେଷ ତାରିଖ",
            due: "ଦେୟ ତାରିଖ",
            update: "ଅଦ୍ୟତନ ତାରିଖ",
        },
    ),
];

/// Date labels for `language`, falling back to English.
pub fn date_labels(language: &str) -> &'static DateLabels {
    DATE_LABELS
        .iter()
        .find(|(code, _)| *code == language)
        .map(|(_, labels)| labels)
        .unwrap_or(&EN_DATE_LABELS)
}

pub(crate) static PENALTY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "en",
        &["penalty", "fine", "breach", "violation", "forfeit", "fee", "late fee", "eviction"],
    ),
    (
        "es",
        &[
            "penalización",
            "multa",
            "incumplimiento",
            "violación",
            "pérdida",
            "tarifa",
            "cargo",
            "desalojo",
        ],
    ),
    (
        "fr",
        &["pénalité", "amende", "violation", "manquement", "perte", "frais", "expulsion"],
    ),
    (
        "de",
        &["strafe", "bußgeld", "verletzung", "verstoß", "verlust", "gebühr", "räumung"],
    ),
    ("hi", &["दंड", "जुर्माना", "उल्लंघन", "हानि", "शुल्क", "बेदखली"]),
];

/// Word used after a day count in notice periods.
pub fn day_unit(language: &str) -> &'static str {
    match language {
        "es" => "días",
        "fr" => "jours",
        _ => "days",
    }
}
