use crate::error::{other_error, Error, SyncResult};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Text pulled from the marked regions of one course page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursePage {
    /// Raw `<title>` text
    pub title: String,
    /// Number of lecture blocks on the page
    pub lecture_count: usize,
    /// Text of every marked region, in document order
    pub fragments: Vec<String>,
}

/// Collect fragments, lecture count and title from a course page.
///
/// Text is recorded when it sits inside a `strong` element or inside a `div`
/// whose class is `lecture_class`. Every such `div` is one lecture.
pub fn collect_page(html: &str, lecture_class: &str) -> SyncResult<CoursePage> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("title")
        .map_err(|e| other_error(&format!("Invalid selector: {:?}", e)))?;

    let title = document
        .select(&title_selector)
        .next()
        .map(|title| title.text().collect::<String>())
        .filter(|title| !title.trim().is_empty())
        .ok_or(Error::MissingTitle)?;

    let is_lecture_block = |element: &ElementRef| {
        element.value().name() == "div" && element.value().attr("class") == Some(lecture_class)
    };
    let is_marked = |element: &ElementRef| {
        element.value().name() == "strong" || is_lecture_block(element)
    };

    let mut lecture_count = 0;
    let mut fragments = Vec::new();

    for node in document.root_element().descendants() {
        if let Some(element) = ElementRef::wrap(node) {
            if is_lecture_block(&element) {
                lecture_count += 1;
            }
            continue;
        }

        let Some(text) = node.value().as_text().map(|text| &**text) else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        if node.ancestors().filter_map(ElementRef::wrap).any(|el| is_marked(&el)) {
            fragments.push(text.to_string());
        }
    }

    debug!(
        lectures = lecture_count,
        fragments = fragments.len(),
        "Collected course page"
    );

    Ok(CoursePage {
        title,
        lecture_count,
        fragments,
    })
}
