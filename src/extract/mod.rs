//! Course page scraping: from HTML to normalized lecture records.

pub mod fragments;
pub mod html;
pub mod normalize;
pub mod repair;

pub use html::{collect_page, CoursePage};
pub use normalize::{LectureRecord, NormalizedLecture};

use crate::error::SyncResult;
use fragments::extract_lecture_data;
use normalize::{
    add_course_title_to_lectures, combine_identical_lectures, filter_course_title, group_lectures,
    remove_invalid_lecture_names,
};
use repair::{decode_data, repair_fragment};
use tracing::info;

/// A course title together with its cleaned-up lectures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub title: String,
    pub lectures: Vec<NormalizedLecture>,
}

/// Scrape a course page into its title and lectures
pub fn extract_course_info(html: &str, lecture_class: &str) -> SyncResult<Course> {
    let page = collect_page(html, lecture_class)?;
    let title = filter_course_title(&repair_fragment(&page.title));

    let lectures = lectures_from_fragments(&page.fragments, page.lecture_count, &title)?;
    info!(course = %title, lectures = lectures.len(), "Extracted course info");

    Ok(Course { title, lectures })
}

/// Run marked fragments through extraction, repair and normalization
pub fn lectures_from_fragments(
    fragments: &[String],
    lecture_count: usize,
    course_title: &str,
) -> SyncResult<Vec<NormalizedLecture>> {
    let lecture_data = extract_lecture_data(fragments, lecture_count)?;
    polish_lecture_data(&lecture_data, course_title)
}

/// Decode, group, merge, validate and title-prefix a flat name/date sequence
pub fn polish_lecture_data(
    lecture_data: &[String],
    course_title: &str,
) -> SyncResult<Vec<NormalizedLecture>> {
    let decoded = decode_data(lecture_data);
    let lectures = group_lectures(decoded)?;
    let lectures = combine_identical_lectures(lectures);
    let lectures = remove_invalid_lecture_names(lectures);
    Ok(add_course_title_to_lectures(lectures, course_title))
}
