//! Technology vocabulary used to tag vacancy descriptions.
//!
//! A [`Taxonomy`] is an ordered list of technology ids, each with one or more
//! synonym phrases. The order is fixed when the taxonomy is built and is the
//! column order of every exported report.

use crate::{Error, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TechId(String);

impl TechId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TechId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TechId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone)]
pub struct TechEntry {
    id: TechId,
    synonyms: Vec<String>,
    patterns: Vec<Regex>,
}

impl TechEntry {
    pub fn id(&self) -> &TechId {
        &self.id
    }

    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }

    pub(crate) fn patterns(&self) -> &[Regex] {
        &self.patterns
    }
}

#[derive(Debug, Clone)]
pub struct Taxonomy {
    entries: Vec<TechEntry>,
}

impl Taxonomy {
    pub fn builder() -> TaxonomyBuilder {
        TaxonomyBuilder::default()
    }

    /// Vocabulary for a search without a specialization.
    pub fn general() -> Result<Self> {
        Self::from_table(GENERAL_KEYWORDS.iter())
    }

    /// Base vocabulary followed by the specialization's own.
    pub fn for_specialization(specialization: Specialization) -> Result<Self> {
        Self::from_table(BASE_KEYWORDS.iter().chain(specialization.keywords()))
    }

    fn from_table<'a, I>(table: I) -> Result<Self>
    where
        I: Iterator<Item = &'a (&'static str, &'static [&'static str])>,
    {
        table
            .fold(Self::builder(), |builder, (id, synonyms)| {
                builder.tech(*id, synonyms.iter().copied())
            })
            .build()
    }

    pub fn entries(&self) -> &[TechEntry] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &TechId> {
        self.entries.iter().map(TechEntry::id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &TechId) -> bool {
        self.entries.iter().any(|entry| &entry.id == id)
    }
}

#[derive(Debug, Default)]
pub struct TaxonomyBuilder {
    entries: Vec<(TechId, Vec<String>)>,
}

impl TaxonomyBuilder {
    /// Adds a technology. Re-adding an id replaces its synonyms in place.
    pub fn tech<I, S>(mut self, id: impl Into<TechId>, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        let synonyms: Vec<String> = synonyms
            .into_iter()
            .map(|s| s.into().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing)) => *existing = synonyms,
            None => self.entries.push((id, synonyms)),
        }
        self
    }

    pub fn build(self) -> Result<Taxonomy> {
        let entries = self
            .entries
            .into_iter()
            .map(|(id, synonyms)| {
                if synonyms.is_empty() {
                    return Err(Error::InvalidTaxonomy(format!("{id} has no synonyms")));
                }
                let patterns = synonyms
                    .iter()
                    .map(|synonym| synonym_pattern(synonym))
                    .collect::<Result<Vec<_>>>()?;
                Ok(TechEntry {
                    id,
                    synonyms,
                    patterns,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Taxonomy { entries })
    }
}

/// Whole-word pattern for a synonym. A boundary is only asserted on a side
/// where the phrase ends in a word character, so `c#` and `node.js` still match.
fn synonym_pattern(synonym: &str) -> Result<Regex> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let starts_word = synonym.chars().next().is_some_and(is_word);
    let ends_word = synonym.chars().last().is_some_and(is_word);

    let pattern = format!(
        "(?i){}{}{}",
        if starts_word { r"\b" } else { "" },
        regex::escape(synonym),
        if ends_word { r"\b" } else { "" },
    );
    Ok(Regex::new(&pattern)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specialization {
    Analyst,
    Frontend,
    Backend,
    Security,
}

impl Specialization {
    pub const ALL: [Specialization; 4] = [
        Self::Analyst,
        Self::Frontend,
        Self::Backend,
        Self::Security,
    ];

    /// Word appended to the search text for this specialization.
    pub fn to_word(&self) -> &'static str {
        match self {
            Self::Analyst => "аналитик",
            Self::Frontend => "фронтенд",
            Self::Backend => "бэкенд",
            Self::Security => "кибербезопасность",
        }
    }

    fn keywords(&self) -> Keywords {
        match self {
            Self::Analyst => ANALYST_KEYWORDS,
            Self::Frontend => FRONTEND_KEYWORDS,
            Self::Backend => BACKEND_KEYWORDS,
            Self::Security => SECURITY_KEYWORDS,
        }
    }
}

impl FromStr for Specialization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|spec| spec.to_word() == name || format!("{spec:?}").to_lowercase() == name)
            .ok_or_else(|| Error::UnknownSpecialization(s.to_string()))
    }
}

type Keywords = &'static [(&'static str, &'static [&'static str])];

const BASE_KEYWORDS: Keywords = &[
    ("GIT", &["git", "гит"]),
    ("LINUX", &["linux", "линукс"]),
    ("DOCKER", &["docker", "докер"]),
    ("AWS", &["aws", "amazon web services"]),
    ("KUBERNETES", &["kubernetes", "k8s", "кубер"]),
];

const ANALYST_KEYWORDS: Keywords = &[
    ("SQL", &["sql", "postgresql", "mysql", "sqlite"]),
    ("PYTHON", &["python", "питон", "пайтон"]),
    ("BI", &["power bi", "tableau", "metabase", "superset"]),
    ("EXCEL", &["excel", "google sheets"]),
    (
        "MATH",
        &[
            "статистика",
            "теория вероятностей",
            "математический анализ",
            "линейная алгебра",
        ],
    ),
    (
        "DATA_SCIENCE",
        &[
            "pandas",
            "numpy",
            "scikit-learn",
            "matplotlib",
            "seaborn",
            "plotly",
            "airflow",
        ],
    ),
];

const FRONTEND_KEYWORDS: Keywords = &[
    ("JAVASCRIPT", &["javascript", "js", "ecmascript"]),
    ("TYPESCRIPT", &["typescript", "ts"]),
    ("REACT", &["react", "react.js"]),
    ("VUE", &["vue", "vue.js"]),
    ("ANGULAR", &["angular"]),
    ("HTML_CSS", &["html", "css", "scss", "sass"]),
    ("WEBPACK", &["webpack"]),
    ("NODEJS", &["node.js", "nodejs"]),
];

const BACKEND_KEYWORDS: Keywords = &[
    ("PYTHON", &["python", "питон", "пайтон"]),
    ("JAVA", &["java"]),
    ("C_SHARP", &["c#", "c sharp"]),
    ("GO", &["go", "golang"]),
    ("NODEJS", &["node.js", "nodejs"]),
    ("SPRING", &["spring"]),
    ("DJANGO", &["django", "джанго"]),
    ("FLASK", &["flask", "фласк"]),
    ("SQL", &["sql", "postgresql", "mysql", "sqlite"]),
    ("NOSQL", &["mongodb", "redis", "cassandra"]),
];

const SECURITY_KEYWORDS: Keywords = &[
    ("SECURITY", &["security", "безопасность", "кибербезопасность"]),
    ("PENTEST", &["pentest", "тестирование на проникновение"]),
    ("OWASP", &["owasp"]),
    ("SIEM", &["siem", "splunk", "arcsight"]),
    ("NETWORK", &["network security", "сетевая безопасность"]),
    ("CRYPTO", &["cryptography", "криптография"]),
    ("COMPLIANCE", &["gdpr", "pci dss", "iso 27001"]),
];

const GENERAL_KEYWORDS: Keywords = &[
    ("PYTHON", &["python", "питон", "пайтон"]),
    ("SQL", &["sql", "postgresql", "mysql", "sqlite"]),
    ("DOCKER", &["docker", "докер"]),
    ("GO", &["go", "golang"]),
    ("LINUX", &["linux", "линукс"]),
    ("GIT", &["git", "гит"]),
    ("AWS", &["aws", "amazon web services"]),
    ("KUBERNETES", &["kubernetes", "k8s", "кубер"]),
    ("DJANGO", &["django", "джанго"]),
    ("FLASK", &["flask", "фласк"]),
    (
        "MATH",
        &[
            "высшая математика",
            "математический анализ",
            "линейная алгебра",
            "теория вероятностей",
            "дифференциальные уравнения",
            "статистика",
            "дискретная математика",
            "численные методы",
        ],
    ),
    (
        "DATA_SCIENCE_LIB",
        &[
            "pandas",
            "numpy",
            "scikit-learn",
            "sklearn",
            "matplotlib",
            "seaborn",
            "tensorflow",
            "pytorch",
            "keras",
            "statsmodels",
            "plotly",
            "xgboost",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(taxonomy: &Taxonomy) -> Vec<&str> {
        taxonomy.ids().map(TechId::as_str).collect()
    }

    #[test]
    fn specialization_puts_base_vocabulary_first() {
        let taxonomy = Taxonomy::for_specialization(Specialization::Frontend).unwrap();
        assert_eq!(
            &ids(&taxonomy)[..6],
            &["GIT", "LINUX", "DOCKER", "AWS", "KUBERNETES", "JAVASCRIPT"]
        );
        assert_eq!(taxonomy.len(), 5 + FRONTEND_KEYWORDS.len());
    }

    #[test]
    fn every_builtin_entry_has_synonyms() {
        let mut all = vec![Taxonomy::general().unwrap()];
        for spec in Specialization::ALL {
            all.push(Taxonomy::for_specialization(spec).unwrap());
        }
        for taxonomy in all {
            assert!(taxonomy.entries().iter().all(|e| !e.synonyms().is_empty()));
        }
    }

    #[test]
    fn builder_rejects_empty_synonym_list() {
        let err = Taxonomy::builder()
            .tech("RUST", Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTaxonomy(_)));

        let err = Taxonomy::builder().tech("RUST", ["  "]).build().unwrap_err();
        assert!(matches!(err, Error::InvalidTaxonomy(_)));
    }

    #[test]
    fn readding_an_id_keeps_its_position() {
        let taxonomy = Taxonomy::builder()
            .tech("A", ["a"])
            .tech("B", ["b"])
            .tech("A", ["alpha"])
            .build()
            .unwrap();
        assert_eq!(ids(&taxonomy), ["A", "B"]);
        assert_eq!(taxonomy.entries()[0].synonyms(), ["alpha"]);
    }

    #[test]
    fn specialization_parses_russian_and_english_names() {
        assert_eq!("бэкенд".parse::<Specialization>().unwrap(), Specialization::Backend);
        assert_eq!("Frontend".parse::<Specialization>().unwrap(), Specialization::Frontend);
        assert_eq!(
            " кибербезопасность ".parse::<Specialization>().unwrap(),
            Specialization::Security
        );
        assert!(matches!(
            "devops".parse::<Specialization>(),
            Err(Error::UnknownSpecialization(name)) if name == "devops"
        ));
    }
}
