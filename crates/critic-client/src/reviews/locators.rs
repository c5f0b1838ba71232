//! Locator strategies for the known review page markup generations.
//!
//! Legacy pages wrap each review in `div.lister-item-content`; current pages use
//! `article.user-review-item` and keep author/date in a sibling
//! `div[data-testid="reviews-author"]` block. Every chain lists the legacy
//! locator first.

use std::sync::LazyLock;

use critic_core::strategy::Strategy;
use scraper::{ElementRef, Html, Selector};

pub(crate) type ContainerLocator = fn(&Html) -> Vec<ElementRef<'_>>;
pub(crate) type FieldLocator<V> = fn(ElementRef<'_>) -> Option<V>;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static LEGACY_CONTAINER: LazyLock<Selector> = LazyLock::new(|| selector("div.lister-item-content"));
static ARTICLE_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| selector("article.user-review-item"));

static LEGACY_RATING: LazyLock<Selector> =
    LazyLock::new(|| selector("span.rating-other-user-rating"));
static STAR_RATING: LazyLock<Selector> = LazyLock::new(|| selector("span.ipc-rating-star"));

static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.title"));
static TITLE_WRAPPER: LazyLock<Selector> = LazyLock::new(|| selector("div.ipc-title"));
static TITLE_WRAPPER_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("a.ipc-title-link-wrapper"));

static BODY_TEXT: LazyLock<Selector> = LazyLock::new(|| selector("div.text"));
static BODY_HTML_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| selector("div.ipc-html-content-inner-div"));

static AUTHOR_NAME: LazyLock<Selector> = LazyLock::new(|| selector("span.display-name-link"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static AUTHOR_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[data-testid="reviews-author"]"#));
static AUTHOR_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"a[data-testid="author-link"]"#));

static DATE_SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span.review-date"));
static DATE_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("li.review-date"));

static SPOILER_BUTTON: LazyLock<Selector> =
    LazyLock::new(|| selector("button.review-spoiler-button"));
static CONTENT_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector("div.content"));
static SPOILER_WARNING: LazyLock<Selector> = LazyLock::new(|| selector("div.spoiler-warning"));

pub(crate) const CONTAINERS: &[Strategy<ContainerLocator>] = &[
    Strategy::new("lister-item-content", legacy_containers),
    Strategy::new("user-review-item", article_containers),
];

pub(crate) const RATING: &[Strategy<FieldLocator<u32>>] = &[
    Strategy::new("rating-other-user-rating", legacy_rating),
    Strategy::new("ipc-rating-star", star_rating),
];

pub(crate) const TITLE: &[Strategy<FieldLocator<String>>] = &[
    Strategy::new("a.title", title_link),
    Strategy::new("ipc-title", wrapped_title_link),
];

pub(crate) const TEXT: &[Strategy<FieldLocator<String>>] = &[
    Strategy::new("div.text", body_text),
    Strategy::new("ipc-html-content", html_content_text),
];

pub(crate) const AUTHOR: &[Strategy<FieldLocator<String>>] = &[
    Strategy::new("display-name-link", display_name_author),
    Strategy::new("reviews-author", author_block_link),
];

pub(crate) const DATE: &[Strategy<FieldLocator<String>>] = &[
    Strategy::new("span.review-date", date_span),
    Strategy::new("reviews-author", author_block_date),
];

/// Each locator yields `Some(true)` only on a positive signal, so the chain is an OR
/// of both. Best-effort: a spoiler without either marker reads as `false`.
pub(crate) const SPOILER: &[Strategy<FieldLocator<bool>>] = &[
    Strategy::new("review-spoiler-button", spoiler_button),
    Strategy::new("spoiler-warning", spoiler_warning),
];

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

fn legacy_containers(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&LEGACY_CONTAINER).collect()
}

fn article_containers(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&ARTICLE_CONTAINER).collect()
}

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

fn legacy_rating(container: ElementRef<'_>) -> Option<u32> {
    descendant(container, &LEGACY_RATING).and_then(rating_value)
}

fn star_rating(container: ElementRef<'_>) -> Option<u32> {
    descendant(container, &STAR_RATING).and_then(rating_value)
}

/// The first nested element whose whole text is digits carries the score.
fn rating_value(marker: ElementRef<'_>) -> Option<u32> {
    let digits = marker
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .map(|el| el.text().collect::<String>())
        .find(|text| {
            let text = text.trim();
            !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
        })?;

    digits.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

// ---------------------------------------------------------------------------
// Title
// ---------------------------------------------------------------------------

fn title_link(container: ElementRef<'_>) -> Option<String> {
    descendant(container, &TITLE_LINK).and_then(trimmed_text)
}

fn wrapped_title_link(container: ElementRef<'_>) -> Option<String> {
    descendant(container, &TITLE_WRAPPER)
        .and_then(|wrapper| descendant(wrapper, &TITLE_WRAPPER_LINK))
        .and_then(trimmed_text)
}

// ---------------------------------------------------------------------------
// Body text
// ---------------------------------------------------------------------------

fn body_text(container: ElementRef<'_>) -> Option<String> {
    descendant(container, &BODY_TEXT).and_then(joined_text)
}

fn html_content_text(container: ElementRef<'_>) -> Option<String> {
    descendant(container, &BODY_HTML_CONTENT).and_then(joined_text)
}

// ---------------------------------------------------------------------------
// Author and date
// ---------------------------------------------------------------------------

fn display_name_author(container: ElementRef<'_>) -> Option<String> {
    descendant(container, &AUTHOR_NAME)
        .and_then(|name| descendant(name, &LINK))
        .and_then(trimmed_text)
}

fn author_block_link(container: ElementRef<'_>) -> Option<String> {
    next_sibling_matching(container, &AUTHOR_BLOCK)
        .and_then(|block| descendant(block, &AUTHOR_LINK))
        .and_then(trimmed_text)
}

fn date_span(container: ElementRef<'_>) -> Option<String> {
    descendant(container, &DATE_SPAN).and_then(trimmed_text)
}

fn author_block_date(container: ElementRef<'_>) -> Option<String> {
    next_sibling_matching(container, &AUTHOR_BLOCK)
        .and_then(|block| descendant(block, &DATE_ITEM))
        .and_then(trimmed_text)
}

// ---------------------------------------------------------------------------
// Spoiler
// ---------------------------------------------------------------------------

fn spoiler_button(container: ElementRef<'_>) -> Option<bool> {
    descendant(container, &SPOILER_BUTTON).map(|_| true)
}

fn spoiler_warning(container: ElementRef<'_>) -> Option<bool> {
    descendant(container, &CONTENT_BLOCK)
        .and_then(|content| descendant(content, &SPOILER_WARNING))
        .map(|_| true)
}

// ---------------------------------------------------------------------------
// Tree helpers
// ---------------------------------------------------------------------------

/// First element below `scope` (excluding `scope` itself) matching `selector`.
fn descendant<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).find(|el| *el != scope)
}

/// First following sibling element matching `selector`.
fn next_sibling_matching<'a>(el: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| selector.matches(sibling))
}

/// Visible text of an element, trimmed; `None` when blank.
fn trimmed_text(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<String>();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Every text node below `el`, each trimmed, joined with single spaces.
fn joined_text(el: ElementRef<'_>) -> Option<String> {
    let parts: Vec<&str> = el
        .text()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}
