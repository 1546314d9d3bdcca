use crate::taxonomy::TechId;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Upper bound the vacancies API accepts for `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub text: String,
    pub area: String,
    /// Zero-based page cursor
    pub page: u32,
    pub per_page: u32,
}

impl SearchParams {
    pub fn new(text: impl Into<String>, area: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            area: area.into(),
            page: 0,
            per_page: MAX_PER_PAGE,
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("text", self.text.clone()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("area", self.area.clone()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostingSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageResult {
    #[serde(default)]
    pub found: u64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub items: Vec<PostingSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Salary {
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub currency: Option<String>,
}

/// Any `{ "name": ... }` object the API nests inside a vacancy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: Option<String>,
}

impl Named {
    fn name_of(named: &Option<Named>) -> Option<&str> {
        named.as_ref().and_then(|n| n.name.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostingDetail {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alternate_url: Option<String>,
    #[serde(default)]
    pub employer: Option<Named>,
    #[serde(default)]
    pub salary: Option<Salary>,
    #[serde(default)]
    pub experience: Option<Named>,
    #[serde(default)]
    pub schedule: Option<Named>,
    #[serde(default)]
    pub area: Option<Named>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub key_skills: Vec<Named>,
}

impl PostingDetail {
    pub fn employer_name(&self) -> Option<&str> {
        Named::name_of(&self.employer)
    }

    pub fn experience_name(&self) -> Option<&str> {
        Named::name_of(&self.experience)
    }

    pub fn schedule_name(&self) -> Option<&str> {
        Named::name_of(&self.schedule)
    }

    pub fn area_name(&self) -> Option<&str> {
        Named::name_of(&self.area)
    }

    pub fn key_skill_names(&self) -> Vec<String> {
        self.key_skills
            .iter()
            .filter_map(|skill| skill.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingRecord {
    pub title: String,
    pub url: String,
    pub company: String,
    pub salary: Option<String>,
    pub experience: String,
    pub remote: bool,
    pub area: Option<String>,
    pub skills: BTreeSet<TechId>,
    pub key_skills: Vec<String>,
}
