//! 省份/地区值对象
//!
//! 加拿大 10 个省与 3 个地区的静态目录，按代码（如 `ON`）创建与比较。
//! 序列化时只写出代码，反序列化时通过 [`Province::create`] 重新校验。

use civic_domain::error::{DomainError, DomainResult};
use civic_domain::value_object::ValueObject;
use civic_macros::value_object;
use std::fmt;

const COUNTRY: &str = "Canada";

/// 省级行政区类别
#[value_object]
#[derive(Copy)]
pub enum ProvinceKind {
    Province,
    Territory,
}

// (代码, 名称, 类别, 人口, 首府)
const CATALOG: [(&str, &str, ProvinceKind, u32, &str); 13] = [
    ("AB", "Alberta", ProvinceKind::Province, 4_428_000, "Edmonton"),
    ("BC", "British Columbia", ProvinceKind::Province, 5_214_000, "Victoria"),
    ("MB", "Manitoba", ProvinceKind::Province, 1_380_000, "Winnipeg"),
    ("NB", "New Brunswick", ProvinceKind::Province, 789_000, "Fredericton"),
    ("NL", "Newfoundland and Labrador", ProvinceKind::Province, 520_000, "St. John's"),
    ("NS", "Nova Scotia", ProvinceKind::Province, 992_000, "Halifax"),
    ("ON", "Ontario", ProvinceKind::Province, 15_000_000, "Toronto"),
    ("PE", "Prince Edward Island", ProvinceKind::Province, 164_000, "Charlottetown"),
    ("QC", "Quebec", ProvinceKind::Province, 8_575_000, "Quebec City"),
    ("SK", "Saskatchewan", ProvinceKind::Province, 1_180_000, "Regina"),
    ("NT", "Northwest Territories", ProvinceKind::Territory, 45_000, "Yellowknife"),
    ("NU", "Nunavut", ProvinceKind::Territory, 40_000, "Iqaluit"),
    ("YT", "Yukon", ProvinceKind::Territory, 42_000, "Whitehorse"),
];

/// 加拿大省份或地区
///
/// 相等性按全部字段比较；由于只能从目录创建，等价于按代码比较。
#[value_object]
#[serde(try_from = "String", into = "String")]
pub struct Province {
    code: String,
    name: String,
    country: String,
    kind: ProvinceKind,
    population: u32,
    capital: String,
}

impl Province {
    /// 按代码创建（忽略首尾空白与大小写）
    pub fn create(code: &str) -> DomainResult<Self> {
        let normalized = code.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(DomainError::invalid_argument(
                "code",
                "province code cannot be empty",
            ));
        }

        CATALOG
            .iter()
            .find(|entry| entry.0 == normalized)
            .map(Self::from_entry)
            .ok_or_else(|| {
                DomainError::invalid_argument("code", format!("invalid province code: {normalized}"))
            })
    }

    pub fn is_valid_code(code: &str) -> bool {
        let code = code.trim();
        !code.is_empty() && CATALOG.iter().any(|entry| entry.0.eq_ignore_ascii_case(code))
    }

    /// 全部省份与地区（目录顺序）
    pub fn all() -> Vec<Self> {
        CATALOG.iter().map(Self::from_entry).collect()
    }

    pub fn provinces() -> Vec<Self> {
        Self::of_kind(ProvinceKind::Province)
    }

    pub fn territories() -> Vec<Self> {
        Self::of_kind(ProvinceKind::Territory)
    }

    fn of_kind(kind: ProvinceKind) -> Vec<Self> {
        CATALOG
            .iter()
            .filter(|entry| entry.2 == kind)
            .map(Self::from_entry)
            .collect()
    }

    fn from_entry(entry: &(&str, &str, ProvinceKind, u32, &str)) -> Self {
        let (code, name, kind, population, capital) = *entry;
        Self {
            code: code.to_string(),
            name: name.to_string(),
            country: COUNTRY.to_string(),
            kind,
            population,
            capital: capital.to_string(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn kind(&self) -> ProvinceKind {
        self.kind
    }

    pub fn population(&self) -> u32 {
        self.population
    }

    pub fn capital(&self) -> &str {
        &self.capital
    }

    pub fn is_province(&self) -> bool {
        self.kind == ProvinceKind::Province
    }

    pub fn is_territory(&self) -> bool {
        self.kind == ProvinceKind::Territory
    }

    /// 该省份居民的默认 IANA 时区
    pub fn default_time_zone(&self) -> &'static str {
        match self.code.as_str() {
            "BC" | "YT" => "America/Vancouver",
            "AB" | "NT" => "America/Edmonton",
            "SK" => "America/Regina",
            "MB" => "America/Winnipeg",
            "QC" => "America/Montreal",
            "NB" | "NS" | "PE" => "America/Halifax",
            "NL" => "America/St_Johns",
            _ => "America/Toronto",
        }
    }
}

impl ValueObject for Province {
    type Error = DomainError;

    fn validate(&self) -> DomainResult<()> {
        let expected = Self::create(&self.code)?;
        if expected != *self {
            return Err(DomainError::invalid_argument(
                "province",
                format!("province {} does not match the catalog entry", self.code),
            ));
        }
        Ok(())
    }
}

impl TryFrom<String> for Province {
    type Error = DomainError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::create(&code)
    }
}

impl From<Province> for String {
    fn from(province: Province) -> Self {
        province.code
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}
