use chrono::{Datelike, Local};
use lecture_sync::calendar::{plan_events, DateContext};
use lecture_sync::config::{EventSettings, DEFAULT_LECTURE_CLASS};
use lecture_sync::error::Error;
use lecture_sync::extract::{extract_course_info, lectures_from_fragments, polish_lecture_data};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Fragments straight from a course page end up as dated, titled lectures
#[test]
fn test_fragments_to_events() {
    let fragments = strings(&[
        "Data Definition and Datatypes",
        "Дата: 26-ти септември, 18:00 - 22:00",
        "5.00",
        "Intro to JS",
        "Дата: 27-ти септември, 09:00 - 12:00",
    ]);

    let lectures = lectures_from_fragments(&fragments, 2, "Databases Basics").unwrap();
    assert_eq!(lectures.len(), 2);
    assert_eq!(lectures[0].name, "Databases Basics - Data Definition and Datatypes");
    assert_eq!(lectures[1].name, "Databases Basics - Intro to JS");

    let ctx = DateContext::now();
    let plan = plan_events(&lectures, &ctx, &EventSettings::default());
    assert!(plan.rejected.is_empty());

    let year = Local::now().year();
    assert!(plan.events[0]
        .start
        .date_time
        .starts_with(&format!("{}-09-26T18:00:00", year)));
    assert!(plan.events[0]
        .end
        .date_time
        .starts_with(&format!("{}-09-26T22:00:00", year)));
    assert!(plan.events[1]
        .start
        .date_time
        .starts_with(&format!("{}-09-27T09:00:00", year)));
    assert_eq!(plan.events[1].start.time_zone, "Europe/Sofia");
}

/// Escaped fragments are matched on their escaped date marker, then decoded
#[test]
fn test_escaped_fragments_are_repaired() {
    let fragments = strings(&[
        r"\xd0\x9d\xd0\xb0\xd1\x87\xd0\xb0\xd0\xbb\xd0\xbe",
        "Intro to JS",
        r"\xd0\x94\xd0\xb0\xd1\x82\xd0\xb0: 3 \xd0\xbc\xd0\xb0\xd1\x80\xd1\x82, 18:00 - 20:00",
    ]);

    let lectures = lectures_from_fragments(&fragments, 1, "JS").unwrap();
    assert_eq!(lectures[0].name, "JS - Intro to JS");
    assert_eq!(lectures[0].date_text, "Дата: 3 март, 18:00 - 20:00");
}

#[test]
fn test_duplicate_dates_and_bad_names() {
    let flat = strings(&[
        "Loops",
        "Дата: 5 март, 18:00 - 20:00",
        "Дата: 6 март, 18:00 - 20:00",
        "Дата: 6 март, 18:00 - 20:00",
        "Arrays",
        "Дата: 5 март, 18:00 - 20:00",
    ]);

    let lectures = polish_lecture_data(&flat, "JS").unwrap();
    assert_eq!(lectures.len(), 2);
    assert_eq!(lectures[0].name, "JS - Loops; Arrays");
    assert_eq!(lectures[1].name, "JS - Unknown");
}

#[test]
fn test_odd_sequence_fails() {
    let flat = strings(&["Loops", "Дата: 5 март, 18:00 - 20:00", "Arrays"]);
    assert!(matches!(
        polish_lecture_data(&flat, "JS"),
        Err(Error::OddFragmentCount(3))
    ));
}

#[test]
fn test_course_page_end_to_end() {
    let html = r#"<!DOCTYPE html>
<html>
<head><title>Express.js Development - октомври 2016 - Софтуерен университет</title></head>
<body>
  <nav><strong>Вход</strong></nav>
  <div class="lecture-paragraph html-raw-wrapper">
    <strong>Routing</strong>
    <ul><li>Express routers</li></ul>
    <strong>Дата: 4 октомври, 18:00 - 22:00</strong>
  </div>
  <div class="lecture-paragraph html-raw-wrapper">
    <strong>Templates</strong>
    <strong>Дата: 6 октомври, 18;00 - 22;00</strong>
  </div>
</body>
</html>"#;

    let course = extract_course_info(html, DEFAULT_LECTURE_CLASS).unwrap();
    assert_eq!(course.title, "Express.js Development");
    assert_eq!(course.lectures.len(), 2);
    assert_eq!(course.lectures[0].name, "Express.js Development - Routing");
    assert_eq!(course.lectures[1].name, "Express.js Development - Templates");

    let ctx = DateContext::fixed(2016, chrono::FixedOffset::east_opt(3 * 3600).unwrap());
    let plan = plan_events(&course.lectures, &ctx, &EventSettings::default());
    assert_eq!(plan.events[1].start.date_time, "2016-10-06T18:00:00+03:00");
    assert_eq!(plan.events[1].end.date_time, "2016-10-06T22:00:00+03:00");
}

#[test]
fn test_page_with_fewer_dates_than_lectures() {
    let html = r#"<html><head><title>JS - март 2017</title></head><body>
  <div class="lecture-paragraph html-raw-wrapper"><strong>Intro</strong></div>
  <div class="lecture-paragraph html-raw-wrapper"><strong>Loops</strong></div>
</body></html>"#;

    assert!(matches!(
        extract_course_info(html, DEFAULT_LECTURE_CLASS),
        Err(Error::TruncatedExtraction { expected: 4, found: 0 })
    ));
}
