use super::fragments::is_date_fragment;
use crate::calendar::time::MONTHS;
use crate::error::{Error, SyncResult};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Name used when the extractor picked a date line as a lecture name
pub const UNKNOWN_LECTURE: &str = "Unknown";

lazy_static! {
    static ref COURSE_TITLE: Regex = Regex::new(&format!(
        r"^(.+?)(?:\s-\s|\s)(?:{})(?:\s|,|$)",
        MONTHS.join("|")
    ))
    .unwrap();
}

/// A lecture name paired with its raw date line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureRecord {
    pub name: String,
    pub date_text: String,
}

/// A lecture after merging, name validation and title prefixing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLecture {
    pub name: String,
    pub date_text: String,
}

/// Pair `[name, date, name, date, ...]` into records
pub fn group_lectures(lectures: Vec<String>) -> SyncResult<Vec<LectureRecord>> {
    if lectures.len() % 2 != 0 {
        return Err(Error::OddFragmentCount(lectures.len()));
    }

    let mut records = Vec::with_capacity(lectures.len() / 2);
    let mut items = lectures.into_iter();
    while let (Some(name), Some(date_text)) = (items.next(), items.next()) {
        records.push(LectureRecord { name, date_text });
    }
    Ok(records)
}

/// Merge records that share the exact same date line.
///
/// The merged record keeps the position of the first occurrence and joins the
/// names with `"; "`.
pub fn combine_identical_lectures(lectures: Vec<LectureRecord>) -> Vec<LectureRecord> {
    let mut combined: Vec<LectureRecord> = Vec::with_capacity(lectures.len());
    let mut seen: HashMap<String, usize> = HashMap::new();

    for lecture in lectures {
        match seen.get(&lecture.date_text) {
            Some(&idx) => {
                debug!(date = %lecture.date_text, "Combining lectures with identical dates");
                let first = &mut combined[idx];
                first.name.push_str("; ");
                first.name.push_str(&lecture.name);
            }
            None => {
                seen.insert(lecture.date_text.clone(), combined.len());
                combined.push(lecture);
            }
        }
    }

    combined
}

/// Replace names that are themselves date lines with [`UNKNOWN_LECTURE`]
pub fn remove_invalid_lecture_names(lectures: Vec<LectureRecord>) -> Vec<LectureRecord> {
    lectures
        .into_iter()
        .map(|mut lecture| {
            if is_date_fragment(&lecture.name) {
                warn!(name = %lecture.name, "Lecture name is a date line, using placeholder");
                lecture.name = UNKNOWN_LECTURE.to_string();
            }
            lecture
        })
        .collect()
}

/// Prefix every lecture name with `"<course title> - "`
pub fn add_course_title_to_lectures(
    lectures: Vec<LectureRecord>,
    course_title: &str,
) -> Vec<NormalizedLecture> {
    lectures
        .into_iter()
        .map(|lecture| NormalizedLecture {
            name: format!("{} - {}", course_title, lecture.name),
            date_text: lecture.date_text,
        })
        .collect()
}

/// Strip the run dates and site name from a page title.
///
/// `"Express.js Development - октомври 2016 - Софтуерен университет"`
/// becomes `"Express.js Development"`.
pub fn filter_course_title(title: &str) -> String {
    let title = title.trim();
    match COURSE_TITLE.captures(title).and_then(|caps| caps.get(1)) {
        Some(course) => course.as_str().trim().to_string(),
        None => {
            warn!(title, "Course title has no month, keeping it whole");
            title.to_string()
        }
    }
}
