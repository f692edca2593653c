//! Ghana job-title classifier: free text → economic-sector category.
//!
//! Titles are normalized (lower-cased, punctuation folded to spaces) and tested
//! against [`KEYWORD_RULES`] in order. Keywords match as substrings, so
//! plurals and compounds ("nurses", "headteacher") classify like the base
//! word; a short list of ambiguous tokens must stand as whole words, so `gra`
//! never fires inside `graphic`. The first matching rule
//! wins: banking and other specific sectors sit above the generic
//! management rule so that "bank manager" stays in Banking & Finance.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobCategory {
    #[serde(rename = "Government Worker")]
    GovernmentWorker,
    #[serde(rename = "Banking & Finance")]
    BankingFinance,
    #[serde(rename = "Healthcare Professional")]
    Healthcare,
    #[serde(rename = "Legal Professional")]
    Legal,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Information Technology")]
    InformationTechnology,
    #[serde(rename = "Telecommunications")]
    Telecommunications,
    #[serde(rename = "Mining, Oil & Gas")]
    MiningOilGas,
    #[serde(rename = "Engineering & Technical")]
    Engineering,
    #[serde(rename = "Management Executive")]
    ManagementExecutive,
    #[serde(rename = "Sales & Marketing")]
    SalesMarketing,
    #[serde(rename = "Security Services")]
    SecurityServices,
    #[serde(rename = "Transport & Logistics")]
    TransportLogistics,
    #[serde(rename = "Agriculture")]
    Agriculture,
    #[serde(rename = "Manufacturing")]
    Manufacturing,
    #[serde(rename = "Construction")]
    Construction,
    #[serde(rename = "Skilled Trades")]
    SkilledTrades,
    #[serde(rename = "Hospitality & Tourism")]
    Hospitality,
    #[serde(rename = "Creative & Media")]
    CreativeMedia,
    #[serde(rename = "Religious & NGO")]
    ReligiousNgo,
    #[serde(rename = "Domestic Services")]
    DomesticServices,
    #[serde(rename = "Trading & Commerce")]
    TradingCommerce,
    #[serde(rename = "Informal Self-Employed")]
    InformalSelfEmployed,
    #[serde(rename = "Other Services")]
    OtherServices,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl JobCategory {
    pub const ALL: [JobCategory; 25] = [
        JobCategory::GovernmentWorker,
        JobCategory::BankingFinance,
        JobCategory::Healthcare,
        JobCategory::Legal,
        JobCategory::Education,
        JobCategory::InformationTechnology,
        JobCategory::Telecommunications,
        JobCategory::MiningOilGas,
        JobCategory::Engineering,
        JobCategory::ManagementExecutive,
        JobCategory::SalesMarketing,
        JobCategory::SecurityServices,
        JobCategory::TransportLogistics,
        JobCategory::Agriculture,
        JobCategory::Manufacturing,
        JobCategory::Construction,
        JobCategory::SkilledTrades,
        JobCategory::Hospitality,
        JobCategory::CreativeMedia,
        JobCategory::ReligiousNgo,
        JobCategory::DomesticServices,
        JobCategory::TradingCommerce,
        JobCategory::InformalSelfEmployed,
        JobCategory::OtherServices,
        JobCategory::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobCategory::GovernmentWorker => "Government Worker",
            JobCategory::BankingFinance => "Banking & Finance",
            JobCategory::Healthcare => "Healthcare Professional",
            JobCategory::Legal => "Legal Professional",
            JobCategory::Education => "Education",
            JobCategory::InformationTechnology => "Information Technology",
            JobCategory::Telecommunications => "Telecommunications",
            JobCategory::MiningOilGas => "Mining, Oil & Gas",
            JobCategory::Engineering => "Engineering & Technical",
            JobCategory::ManagementExecutive => "Management Executive",
            JobCategory::SalesMarketing => "Sales & Marketing",
            JobCategory::SecurityServices => "Security Services",
            JobCategory::TransportLogistics => "Transport & Logistics",
            JobCategory::Agriculture => "Agriculture",
            JobCategory::Manufacturing => "Manufacturing",
            JobCategory::Construction => "Construction",
            JobCategory::SkilledTrades => "Skilled Trades",
            JobCategory::Hospitality => "Hospitality & Tourism",
            JobCategory::CreativeMedia => "Creative & Media",
            JobCategory::ReligiousNgo => "Religious & NGO",
            JobCategory::DomesticServices => "Domestic Services",
            JobCategory::TradingCommerce => "Trading & Commerce",
            JobCategory::InformalSelfEmployed => "Informal Self-Employed",
            JobCategory::OtherServices => "Other Services",
            JobCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for JobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered keyword rules; keywords are already in normalized form.
pub const KEYWORD_RULES: &[(JobCategory, &[&str])] = &[
    (
        JobCategory::GovernmentWorker,
        &[
            "civil servant",
            "public servant",
            "government",
            "ministry",
            "district assembly",
            "municipal assembly",
            "metropolitan assembly",
            "assemblyman",
            "member of parliament",
            "police",
            "policeman",
            "policewoman",
            "soldier",
            "military",
            "army",
            "navy",
            "air force",
            "immigration officer",
            "customs officer",
            "gra",
            "ghana revenue authority",
            "fire service",
            "fireman",
            "prisons officer",
            "ges",
            "ghana health service",
            "cocobod",
        ],
    ),
    (
        JobCategory::BankingFinance,
        &[
            "bank",
            "banker",
            "banking",
            "teller",
            "loan officer",
            "credit officer",
            "finance",
            "financial",
            "accountant",
            "accounting",
            "accounts",
            "auditor",
            "audit",
            "treasury",
            "investment",
            "insurance",
            "actuary",
            "microfinance",
            "relationship officer",
            "forex",
            "bursar",
        ],
    ),
    (
        JobCategory::Healthcare,
        &[
            "doctor",
            "physician",
            "surgeon",
            "nurse",
            "nursing",
            "midwife",
            "pharmacist",
            "pharmacy",
            "dentist",
            "medical",
            "lab technician",
            "laboratory scientist",
            "radiographer",
            "physiotherapist",
            "optometrist",
            "anaesthetist",
            "health worker",
            "clinician",
            "paramedic",
            "hospital",
        ],
    ),
    (
        JobCategory::Legal,
        &[
            "lawyer",
            "barrister",
            "solicitor",
            "attorney",
            "legal",
            "judge",
            "magistrate",
            "paralegal",
            "notary",
        ],
    ),
    (
        JobCategory::Education,
        &[
            "teacher",
            "lecturer",
            "professor",
            "tutor",
            "headmaster",
            "headmistress",
            "principal",
            "educator",
            "school",
            "teaching",
            "instructor",
        ],
    ),
    (
        JobCategory::InformationTechnology,
        &[
            "software",
            "developer",
            "programmer",
            "it",
            "ict",
            "data scientist",
            "data analyst",
            "network administrator",
            "system administrator",
            "web",
            "database",
            "devops",
            "cybersecurity",
            "computer",
        ],
    ),
    (
        JobCategory::Telecommunications,
        &[
            "telecom",
            "telecommunications",
            "mtn",
            "vodafone",
            "airteltigo",
            "network engineer",
            "call center",
            "mobile money",
            "momo",
            "tower technician",
        ],
    ),
    (
        JobCategory::MiningOilGas,
        &[
            "mining",
            "miner",
            "mine",
            "geologist",
            "oil",
            "gas",
            "petroleum",
            "drilling",
            "rig",
            "galamsey",
        ],
    ),
    (
        JobCategory::Engineering,
        &[
            "engineer",
            "engineering",
            "technician",
            "architect",
            "surveyor",
            "quantity surveyor",
            "draughtsman",
            "technologist",
        ],
    ),
    (
        JobCategory::ManagementExecutive,
        &[
            "manager",
            "director",
            "managing director",
            "general manager",
            "ceo",
            "chief executive",
            "executive",
            "administrator",
            "supervisor",
            "head of",
            "coordinator",
        ],
    ),
    (
        JobCategory::SalesMarketing,
        &[
            "sales",
            "salesman",
            "saleswoman",
            "sales representative",
            "marketing",
            "marketer",
            "brand",
            "advertising",
            "business development",
            "customer service",
            "merchandiser",
            "promoter",
        ],
    ),
    (
        JobCategory::SecurityServices,
        &["security", "guard", "watchman", "bouncer"],
    ),
    (
        JobCategory::TransportLogistics,
        &[
            "driver",
            "taxi",
            "trotro",
            "okada",
            "truck",
            "bus",
            "logistics",
            "dispatch",
            "dispatcher",
            "courier",
            "delivery",
            "shipping",
            "clearing agent",
            "pilot",
            "seaman",
        ],
    ),
    (
        JobCategory::Agriculture,
        &[
            "farmer",
            "farming",
            "farm",
            "agriculture",
            "agricultural",
            "cocoa",
            "fisherman",
            "fishing",
            "livestock",
            "poultry",
            "agronomist",
            "extension officer",
        ],
    ),
    (
        JobCategory::Manufacturing,
        &[
            "factory",
            "manufacturing",
            "production",
            "machine operator",
            "operator",
            "assembly",
            "plant",
        ],
    ),
    (
        JobCategory::Construction,
        &[
            "mason",
            "bricklayer",
            "construction",
            "builder",
            "contractor",
            "steel bender",
            "tiler",
            "site",
            "labourer",
            "laborer",
        ],
    ),
    (
        JobCategory::SkilledTrades,
        &[
            "electrician",
            "plumber",
            "welder",
            "mechanic",
            "fitter",
            "carpenter",
            "tailor",
            "seamstress",
            "dressmaker",
            "hairdresser",
            "barber",
            "beautician",
            "cobbler",
            "shoemaker",
            "vulcanizer",
            "painter",
            "artisan",
            "craftsman",
        ],
    ),
    (
        JobCategory::Hospitality,
        &[
            "chef",
            "cook",
            "waiter",
            "waitress",
            "hotel",
            "restaurant",
            "caterer",
            "catering",
            "bartender",
            "receptionist",
            "tour guide",
            "tourism",
            "hospitality",
            "chop bar",
        ],
    ),
    (
        JobCategory::CreativeMedia,
        &[
            "journalist",
            "reporter",
            "presenter",
            "broadcaster",
            "musician",
            "artist",
            "designer",
            "graphic designer",
            "photographer",
            "videographer",
            "actor",
            "actress",
            "producer",
            "editor",
            "writer",
            "dj",
            "media",
        ],
    ),
    (
        JobCategory::ReligiousNgo,
        &[
            "pastor",
            "priest",
            "reverend",
            "imam",
            "clergy",
            "evangelist",
            "missionary",
            "ngo",
            "charity",
            "volunteer",
            "development worker",
        ],
    ),
    (
        JobCategory::DomesticServices,
        &[
            "house help",
            "housekeeper",
            "maid",
            "nanny",
            "cleaner",
            "gardener",
            "domestic",
            "caretaker",
            "steward",
            "laundry",
        ],
    ),
    (
        JobCategory::TradingCommerce,
        &[
            "trader",
            "trading",
            "merchant",
            "shop owner",
            "shopkeeper",
            "retailer",
            "wholesaler",
            "market",
            "importer",
            "exporter",
            "seller",
            "vendor",
            "store",
            "storekeeper",
            "supermarket",
            "provisions",
            "business owner",
            "businessman",
            "businesswoman",
        ],
    ),
    (
        JobCategory::InformalSelfEmployed,
        &[
            "self employed",
            "hawker",
            "kayayo",
            "kayayei",
            "porter",
            "freelance",
            "freelancer",
            "casual worker",
            "entrepreneur",
        ],
    ),
];

/// Lower-case, fold every non-alphanumeric run into a single space, trim.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for word in lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Short or ambiguous keywords that must stand as whole words; every other
/// keyword also matches inside compounds and plurals ("headteacher", "nurses").
const WHOLE_WORD_KEYWORDS: &[&str] = &[
    "gra", "ges", "it", "ict", "rig", "oil", "gas", "bus", "dj", "mine", "site", "plant", "store",
    "market", "ceo", "mtn", "ngo", "hospital", "teller",
];

fn contains_word(text: &str, phrase: &str) -> bool {
    let bytes = text.as_bytes();
    text.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let starts_word = start == 0 || bytes[start - 1] == b' ';
        let ends_word = end == bytes.len() || bytes[end] == b' ';
        starts_word && ends_word
    })
}

fn keyword_matches(text: &str, keyword: &str) -> bool {
    if WHOLE_WORD_KEYWORDS.contains(&keyword) {
        contains_word(text, keyword)
    } else {
        text.contains(keyword)
    }
}

/// Map a free-text job title to its sector. Empty input is `Unknown`; text
/// that matches no rule is `OtherServices`.
pub fn categorize(title: &str) -> JobCategory {
    let normalized = normalize_title(title);
    if normalized.is_empty() {
        return JobCategory::Unknown;
    }
    KEYWORD_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| keyword_matches(&normalized, kw)))
        .map(|(category, _)| *category)
        .unwrap_or(JobCategory::OtherServices)
}
