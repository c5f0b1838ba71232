//! Multi-schema review extraction.
//!
//! Container discovery picks one markup generation for the whole document;
//! field resolution then runs its own fallback chain inside every container,
//! independent of which container locator matched. Pages that mix an old
//! container shape with new inner markup still resolve.

mod locators;

use critic_core::error::ExtractError;
use critic_core::models::{RawDocument, ReviewRecord};
use critic_core::strategy::{first_match, resolve};
use critic_core::traits::Extractor;
use scraper::{ElementRef, Html};

use self::locators::{AUTHOR, CONTAINERS, DATE, RATING, SPOILER, TEXT, TITLE};

/// Review extractor for user-review listing pages.
///
/// Stateless; every call parses its own tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlReviewExtractor;

impl HtmlReviewExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for HtmlReviewExtractor {
    fn extract(&self, document: &RawDocument) -> Result<Vec<ReviewRecord>, ExtractError> {
        let html = document.text()?;
        if html.trim().is_empty() {
            return Err(ExtractError::Empty);
        }

        let parsed = Html::parse_document(html);
        Ok(extract_reviews(&parsed))
    }
}

/// Extract reviews from an already parsed document, in document order.
pub fn extract_reviews(document: &Html) -> Vec<ReviewRecord> {
    let Some((schema, containers)) = first_match(CONTAINERS, |locate| {
        let found = locate(document);
        (!found.is_empty()).then_some(found)
    }) else {
        tracing::debug!("No review containers found");
        return Vec::new();
    };

    tracing::debug!(
        schema,
        containers = containers.len(),
        "Matched review containers"
    );

    let total = containers.len();
    let reviews: Vec<ReviewRecord> = containers
        .into_iter()
        .map(resolve_record)
        .filter(ReviewRecord::is_viable)
        .collect();

    tracing::info!("Parsed {} reviews from {} containers", reviews.len(), total);
    reviews
}

/// Resolve every field of one container through its fallback chain.
fn resolve_record(container: ElementRef<'_>) -> ReviewRecord {
    ReviewRecord {
        rating: resolve(RATING, |locate| locate(container)),
        title: resolve(TITLE, |locate| locate(container)),
        text: resolve(TEXT, |locate| locate(container)),
        author: resolve(AUTHOR, |locate| locate(container)),
        date: resolve(DATE, |locate| locate(container)),
        is_spoiler: resolve(SPOILER, |locate| locate(container)).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Result<Vec<ReviewRecord>, ExtractError> {
        HtmlReviewExtractor::new().extract(&RawDocument::from_html(html))
    }

    fn page(body: &str) -> String {
        format!("<!DOCTYPE html><html><head><title>Reviews</title></head><body>{body}</body></html>")
    }

    const LEGACY_REVIEW: &str = r#"
        <div class="lister-item-content">
            <div class="ipl-ratings-bar">
                <span class="rating-other-user-rating">
                    <svg class="ipl-icon"></svg>
                    <span>8</span><span class="point-scale">/10</span>
                </span>
            </div>
            <a href="/review/rw1/" class="title"> Great film
</a>
            <div class="display-name-date">
                <span class="display-name-link"><a href="/user/ur1/">cinephile</a></span>
                <span class="review-date">14 March 2021</span>
            </div>
            <div class="content">
                <div class="text show-more__control"><span>A </span><span> tense </span><span>thriller</span></div>
            </div>
        </div>"#;

    const CURRENT_REVIEW: &str = r#"
        <div class="ipc-list-card">
            <article class="user-review-item">
                <span class="ipc-rating-star ipc-rating-star--base">
                    <svg></svg><span class="ipc-rating-star--rating">8</span><span class="ipc-rating-star--maxRating">/10</span>
                </span>
                <div class="ipc-title"><a class="ipc-title-link-wrapper" href="/review/rw1/"><h3 class="ipc-title__text">Great film</h3></a></div>
                <div class="ipc-html-content ipc-html-content--base">
                    <div class="ipc-html-content-inner-div">A <i>tense</i>
                        thriller</div>
                </div>
            </article>
            <div data-testid="reviews-author">
                <ul>
                    <li><a data-testid="author-link" href="/user/ur1/">cinephile</a></li>
                    <li class="review-date">14 March 2021</li>
                </ul>
            </div>
        </div>"#;

    fn expected_review() -> ReviewRecord {
        ReviewRecord {
            rating: Some(8),
            title: Some("Great film".into()),
            text: Some("A tense thriller".into()),
            author: Some("cinephile".into()),
            date: Some("14 March 2021".into()),
            is_spoiler: false,
        }
    }

    #[test]
    fn test_legacy_review_round_trip() {
        let reviews = extract(&page(LEGACY_REVIEW)).unwrap();
        assert_eq!(reviews, vec![expected_review()]);
    }

    #[test]
    fn test_fallback_chain_is_value_equivalent() {
        let legacy = extract(&page(LEGACY_REVIEW)).unwrap();
        let current = extract(&page(CURRENT_REVIEW)).unwrap();
        assert_eq!(legacy, current);
    }

    #[test]
    fn test_body_only_review() {
        let html = page(
            r#"<article class="user-review-item"><div class="ipc-html-content-inner-div">Okay, not great</div></article>"#,
        );
        let reviews = extract(&html).unwrap();
        assert_eq!(
            reviews,
            vec![ReviewRecord {
                text: Some("Okay, not great".into()),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn test_spoiler_only_container_is_dropped() {
        let html = page(
            r#"<div class="lister-item-content"><button class="review-spoiler-button">Spoiler</button><span class="rating-other-user-rating"><span>3</span></span></div>"#,
        );
        assert!(extract(&html).unwrap().is_empty());
    }

    #[test]
    fn test_spoiler_flag_on_kept_record() {
        let html = page(
            r#"<div class="lister-item-content"><a class="title">Twist</a><div class="content"><div class="spoiler-warning">Warning: Spoilers</div><div class="text">The butler did it.</div></div></div>"#,
        );
        let reviews = extract(&html).unwrap();
        assert_eq!(reviews.len(), 1);
        assert!(reviews[0].is_spoiler);
        assert_eq!(reviews[0].text.as_deref(), Some("The butler did it."));
    }

    #[test]
    fn test_unknown_schema_is_empty_not_error() {
        let html = page(r#"<div class="review"><p>Loved it</p></div>"#);
        assert!(extract(&html).unwrap().is_empty());
    }

    #[test]
    fn test_first_container_schema_wins_for_whole_document() {
        let html = page(&format!(
            r#"{LEGACY_REVIEW}<article class="user-review-item"><div class="ipc-html-content-inner-div">ignored</div></article>"#
        ));
        let reviews = extract(&html).unwrap();
        assert_eq!(reviews, vec![expected_review()]);
    }

    #[test]
    fn test_mixed_generation_fields_resolve() {
        let html = page(
            r#"<div class="lister-item-content"><span class="ipc-rating-star"><span>6</span></span><div class="ipc-title"><a class="ipc-title-link-wrapper">Mixed</a></div><div class="ipc-html-content-inner-div">New body in old shell</div></div>"#,
        );
        let reviews = extract(&html).unwrap();
        assert_eq!(reviews[0].rating, Some(6));
        assert_eq!(reviews[0].title.as_deref(), Some("Mixed"));
        assert_eq!(reviews[0].text.as_deref(), Some("New body in old shell"));
    }

    #[test]
    fn test_document_order_and_idempotence() {
        let html = page(
            r#"
            <div class="lister-item-content"><a class="title">First</a></div>
            <div class="lister-item-content"><span class="review-date">no content</span></div>
            <div class="lister-item-content"><div class="text">Second</div></div>
            <div class="lister-item-content"><a class="title">Third</a></div>"#,
        );
        let doc = RawDocument::from_html(html);
        let extractor = HtmlReviewExtractor::new();

        let first = extractor.extract(&doc).unwrap();
        let second = extractor.extract(&doc).unwrap();

        assert_eq!(first, second);
        let labels: Vec<_> = first
            .iter()
            .map(|r| r.title.clone().or(r.text.clone()).unwrap())
            .collect();
        assert_eq!(labels, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(extract(""), Err(ExtractError::Empty));
        assert_eq!(extract("   \n\t"), Err(ExtractError::Empty));

        let bad = RawDocument {
            body: vec![b'<', b'p', b'>', 0xff, 0xfe],
            ..Default::default()
        };
        assert!(matches!(
            HtmlReviewExtractor::new().extract(&bad),
            Err(ExtractError::Undecodable(_))
        ));
    }

    #[test]
    fn test_tag_free_text_is_empty_not_error() {
        assert_eq!(extract("No reviews yet for this title."), Ok(vec![]));
        assert_eq!(extract("3 < 4 and 5 > 2"), Ok(vec![]));
    }

    #[test]
    fn test_fragment_without_html_shell_parses() {
        let reviews =
            extract(r#"<article class="user-review-item"><a class="title">Bare</a></article>"#)
                .unwrap();
        assert_eq!(reviews[0].title.as_deref(), Some("Bare"));
    }
}
