//! Report built from the employer-entered `key_skills` of each vacancy,
//! as opposed to the taxonomy match over the description.

use crate::models::PostingRecord;
use crate::writer::ReportTable;

pub const KEY_SKILL_COLUMNS: [&str; 3] = ["URL", "Name", "Area"];

/// Upper-cased skill names with the number of vacancies listing them, in
/// first-seen order.
pub fn tally(records: &[PostingRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        for skill in record_skills(record) {
            match counts.iter_mut().find(|(name, _)| *name == skill) {
                Some((_, count)) => *count += 1,
                None => counts.push((skill, 1)),
            }
        }
    }
    counts
}

/// One column per skill listed by more than `min_count` vacancies.
pub fn export(records: &[PostingRecord], min_count: usize) -> ReportTable {
    let skills: Vec<String> = tally(records)
        .into_iter()
        .filter(|(_, count)| *count > min_count)
        .map(|(name, _)| name)
        .collect();

    let header = KEY_SKILL_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(skills.iter().cloned())
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            let listed = record_skills(record);
            [
                record.url.clone(),
                record.title.clone(),
                record.area.clone().unwrap_or_default(),
            ]
            .into_iter()
            .chain(
                skills
                    .iter()
                    .map(|skill| if listed.contains(skill) { "1" } else { "0" }.to_string()),
            )
            .collect()
        })
        .collect();

    ReportTable::from_parts(header, rows)
}

// A vacancy listing the same skill twice still counts once.
fn record_skills(record: &PostingRecord) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for skill in &record.key_skills {
        let skill = skill.trim().to_uppercase();
        if !skill.is_empty() && !skills.contains(&skill) {
            skills.push(skill);
        }
    }
    skills
}
