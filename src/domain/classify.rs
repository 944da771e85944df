//! Name-based instrument classification.
//!
//! Every label dimension is decided by ordered substring rules against the
//! display name: first matching rule wins, otherwise the dimension's default
//! applies. The rule tables are immutable data built once at startup and
//! passed in explicitly, so classification is a pure total function.
//!
//! Keyword matching is byte-exact (no case folding); the tables carry the
//! Korean and English spellings that actually occur in fund names.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sector {
    Semiconductor,
    Tech,
    SecondaryBattery,
    Biotech,
    Financial,
    Energy,
    RealEstate,
    Bond,
    Commodity,
    Automotive,
    BroadIndex,
    Other,
}

impl Sector {
    pub fn label(self) -> &'static str {
        match self {
            Sector::Semiconductor => "semiconductor",
            Sector::Tech => "IT/tech",
            Sector::SecondaryBattery => "secondary-battery",
            Sector::Biotech => "biotech",
            Sector::Financial => "financial",
            Sector::Energy => "energy",
            Sector::RealEstate => "real-estate",
            Sector::Bond => "bond",
            Sector::Commodity => "commodity",
            Sector::Automotive => "automotive",
            Sector::BroadIndex => "broad-index",
            Sector::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketScope {
    Domestic,
    Foreign,
}

impl MarketScope {
    pub fn label(self) -> &'static str {
        match self {
            MarketScope::Domestic => "domestic",
            MarketScope::Foreign => "foreign",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leverage {
    None,
    TwoX,
    ThreeX,
    Inverse,
}

impl Leverage {
    pub fn label(self) -> &'static str {
        match self {
            Leverage::None => "none",
            Leverage::TwoX => "2x",
            Leverage::ThreeX => "3x",
            Leverage::Inverse => "inverse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyHedge {
    NotApplicable,
    Hedged,
    Unhedged,
}

impl CurrencyHedge {
    pub fn label(self) -> &'static str {
        match self {
            CurrencyHedge::NotApplicable => "not-applicable-domestic",
            CurrencyHedge::Hedged => "hedged",
            CurrencyHedge::Unhedged => "unhedged",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividendStyle {
    Standard,
    Income,
    Growth,
}

impl DividendStyle {
    pub fn label(self) -> &'static str {
        match self {
            DividendStyle::Standard => "standard",
            DividendStyle::Income => "income",
            DividendStyle::Growth => "growth",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(Sector, MarketScope, Leverage, CurrencyHedge, DividendStyle);

/// The full label set for one instrument. Assigned once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationLabels {
    pub sector: Sector,
    pub scope: MarketScope,
    pub leverage: Leverage,
    pub hedge: CurrencyHedge,
    pub dividend: DividendStyle,
}

/// One ordered sector rule: a name matching any keyword takes this sector.
#[derive(Debug, Clone, Copy)]
pub struct SectorRule {
    pub sector: Sector,
    pub keywords: &'static [&'static str],
}

/// Immutable rule tables for every label dimension.
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    pub foreign_markets: &'static [&'static str],
    pub leverage_markers: &'static [&'static str],
    pub two_x_markers: &'static [&'static str],
    pub three_x_markers: &'static [&'static str],
    pub inverse_markers: &'static [&'static str],
    pub hedge_markers: &'static [&'static str],
    pub income_markers: &'static [&'static str],
    pub growth_markers: &'static [&'static str],
    pub sector_rules: &'static [SectorRule],
}

const FOREIGN_MARKETS: &[&str] = &[
    "미국", "S&P", "NASDAQ", "SPY", "나스닥", "중국", "일본", "유럽", "글로벌", "MSCI",
    "선진국", "이머징", "베트남", "인도", "USA", "China", "Japan", "Europe",
];

const LEVERAGE_MARKERS: &[&str] = &["LEVERAGE", "레버리지"];
const TWO_X_MARKERS: &[&str] = &["2X", "2배"];
const THREE_X_MARKERS: &[&str] = &["3X", "3배"];
const INVERSE_MARKERS: &[&str] = &["INVERSE", "인버스", "곱버스", "Short"];

const HEDGE_MARKERS: &[&str] = &["환헤지", "(H)", "Hedged"];

const INCOME_MARKERS: &[&str] = &["배당", "DIV", "Dividend", "고배당"];
const GROWTH_MARKERS: &[&str] = &["성장", "Growth"];

// Order matters: "은행" must hit the financial rule before "은" can hit the
// commodity rule, and "전기차" belongs to batteries, not automotive.
const SECTOR_RULES: &[SectorRule] = &[
    SectorRule {
        sector: Sector::Semiconductor,
        keywords: &["반도체", "칩", "Chip", "Semi", "필라델피아", "SOX"],
    },
    SectorRule {
        sector: Sector::Tech,
        keywords: &[
            "IT", "인터넷", "테크", "Tech", "Technology", "Internet", "소프트웨어", "Cloud",
            "Cyber", "Software",
        ],
    },
    SectorRule {
        sector: Sector::SecondaryBattery,
        keywords: &["2차전지", "배터리", "Battery", "전기차"],
    },
    SectorRule {
        sector: Sector::Biotech,
        keywords: &["바이오", "Bio", "제약", "Pharma", "헬스케어", "Healthcare", "Health"],
    },
    SectorRule {
        sector: Sector::Financial,
        keywords: &["금융", "은행", "Bank", "Finance", "Financial"],
    },
    SectorRule {
        sector: Sector::Energy,
        keywords: &["에너지", "Energy", "원유", "Oil", "Gas"],
    },
    SectorRule {
        sector: Sector::RealEstate,
        keywords: &["리츠", "REIT", "부동산", "Real Estate"],
    },
    SectorRule {
        sector: Sector::Bond,
        keywords: &["채권", "Bond", "국채", "회사채", "Treasury", "TLT"],
    },
    SectorRule {
        sector: Sector::Commodity,
        keywords: &["금", "Gold", "은", "Silver", "원자재", "Commodity"],
    },
    SectorRule {
        sector: Sector::Automotive,
        keywords: &["자동차", "Auto", "Car", "Mobility", "Vehicle"],
    },
    SectorRule {
        sector: Sector::BroadIndex,
        keywords: &[
            "KOSPI", "KOSDAQ", "KRX", "S&P500", "NASDAQ100", "Russell", "Dow", "QQQ",
        ],
    },
];

impl ClassifierRules {
    /// The built-in rule set for Korean-listed ETF names.
    pub fn standard() -> Self {
        ClassifierRules {
            foreign_markets: FOREIGN_MARKETS,
            leverage_markers: LEVERAGE_MARKERS,
            two_x_markers: TWO_X_MARKERS,
            three_x_markers: THREE_X_MARKERS,
            inverse_markers: INVERSE_MARKERS,
            hedge_markers: HEDGE_MARKERS,
            income_markers: INCOME_MARKERS,
            growth_markers: GROWTH_MARKERS,
            sector_rules: SECTOR_RULES,
        }
    }
}

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| name.contains(kw))
}

/// Classify an instrument by display name. Total and deterministic.
pub fn classify(name: &str, rules: &ClassifierRules) -> ClassificationLabels {
    let scope = if contains_any(name, rules.foreign_markets) {
        MarketScope::Foreign
    } else {
        MarketScope::Domestic
    };

    let leverage = if contains_any(name, rules.leverage_markers) {
        if contains_any(name, rules.two_x_markers) {
            Leverage::TwoX
        } else if contains_any(name, rules.three_x_markers) {
            Leverage::ThreeX
        } else {
            // Bare "레버리지" in a Korean fund name means 2x.
            Leverage::TwoX
        }
    } else if contains_any(name, rules.inverse_markers) {
        Leverage::Inverse
    } else {
        Leverage::None
    };

    let hedge = match scope {
        MarketScope::Domestic => CurrencyHedge::NotApplicable,
        MarketScope::Foreign => {
            if contains_any(name, rules.hedge_markers) {
                CurrencyHedge::Hedged
            } else {
                CurrencyHedge::Unhedged
            }
        }
    };

    let dividend = if contains_any(name, rules.income_markers) {
        DividendStyle::Income
    } else if contains_any(name, rules.growth_markers) {
        DividendStyle::Growth
    } else {
        DividendStyle::Standard
    };

    let sector = rules
        .sector_rules
        .iter()
        .find(|rule| contains_any(name, rule.keywords))
        .map(|rule| rule.sector)
        .unwrap_or(Sector::Other);

    ClassificationLabels {
        sector,
        scope,
        leverage,
        hedge,
        dividend,
    }
}
