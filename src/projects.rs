//! Project grid behaviour: where each card leads, status filtering and the
//! count label.
//!
//! Cards are rendered elsewhere. Each `.card` describes its project through
//! data attributes (`data-id`, `data-repo`, `data-url`, and `data-detail`
//! when a detail page exists) and shows its status as a
//! `card__status--<status>` class. This module fills in the call to action,
//! routes card clicks, and hides cards that do not match the active filter.

#[cfg(test)]
#[path = "projects_test.rs"]
mod projects_test;

use std::fmt;

/// Prefix of the class carrying a card's status.
pub const STATUS_CLASS_PREFIX: &str = "card__status--";

/// Filter value that shows every project.
pub const ALL_FILTER: &str = "all";

/// The fields of a project that decide its card behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub status: String,
    /// The project has an overview or hero section, so a detail page exists.
    pub has_detail: bool,
    pub repo: Option<String>,
    pub url: Option<String>,
}

/// Where a card leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    /// The site's own detail page.
    Project,
    /// The source repository, when there is no live URL.
    Repo,
    /// The live URL, falling back to the repository.
    External,
}

/// Call to action shown on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCta {
    pub label: &'static str,
    pub href: Option<String>,
    /// Opens in a new tab.
    pub external: bool,
}

impl Project {
    pub fn kind(&self) -> CardKind {
        if self.has_detail {
            CardKind::Project
        } else if self.repo.is_some() && self.url.is_none() {
            CardKind::Repo
        } else {
            CardKind::External
        }
    }

    pub fn cta(&self) -> CardCta {
        match self.kind() {
            CardKind::Project => CardCta {
                label: "View →",
                href: Some(detail_href(&self.id)),
                external: false,
            },
            CardKind::Repo => CardCta { label: "Repo →", href: self.repo.clone(), external: true },
            CardKind::External => CardCta {
                label: "Link →",
                href: self.url.clone().or_else(|| self.repo.clone()),
                external: true,
            },
        }
    }
}

pub fn detail_href(id: &str) -> String {
    format!("/project.html?id={id}")
}

/// Treat empty strings and serialized nulls as absent.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty() && *v != "null" && *v != "undefined")
}

/// Status named by the first `card__status--*` class in `class_name`.
pub fn status_from_classes(class_name: &str) -> Option<&str> {
    class_name
        .split_whitespace()
        .find_map(|class| class.strip_prefix(STATUS_CLASS_PREFIX))
        .filter(|status| !status.is_empty())
}

/// Which projects the grid shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    /// Filter named by a button's `data-filter` value. Missing or `all`
    /// shows everything.
    pub fn parse(raw: Option<&str>) -> Self {
        match present(raw) {
            None | Some(ALL_FILTER) => Self::All,
            Some(status) => Self::Only(status.to_owned()),
        }
    }

    pub fn matches(&self, status: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => status == Some(wanted.as_str()),
        }
    }

    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects.iter().filter(|project| self.matches(Some(&project.status))).collect()
    }

    /// Count label: `N project(s)` unfiltered, `shown/total projects` otherwise.
    pub fn count_label(&self, shown: usize, total: usize) -> String {
        match self {
            Self::All => format!("{shown} project{}", if shown == 1 { "" } else { "s" }),
            Self::Only(_) => format!("{shown}/{total} projects"),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_FILTER),
            Self::Only(status) => f.write_str(status),
        }
    }
}

#[cfg(feature = "csr")]
pub use browser::attach;

#[cfg(feature = "csr")]
mod browser {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{Document, Element, HtmlElement, MouseEvent};

    use super::*;

    const CARD_SELECTOR: &str = ".card";
    const LINK_SELECTOR: &str = ".card__link";
    const STATUS_SELECTOR: &str = ".card__status";
    const FILTER_SELECTOR: &str = ".filter-btn";
    const COUNT_ID: &str = "project-count";
    const ACTIVE_CLASS: &str = "active";

    fn elements(root: &Element, selector: &str) -> Vec<Element> {
        match root.query_selector_all(selector) {
            Ok(nodes) => (0..nodes.length())
                .filter_map(|index| nodes.item(index))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .collect(),
            Err(err) => {
                log::warn!("projects: bad selector {selector:?}: {err:?}");
                Vec::new()
            }
        }
    }

    fn project_of(card: &Element) -> Project {
        let attr = |name: &str| present(card.get_attribute(name).as_deref()).map(str::to_owned);
        let status = card
            .query_selector(STATUS_SELECTOR)
            .unwrap_or_default()
            .and_then(|el| status_from_classes(&el.class_name()).map(str::to_owned))
            .unwrap_or_default();
        Project {
            id: attr("data-id").unwrap_or_default(),
            status,
            has_detail: card.has_attribute("data-detail"),
            repo: attr("data-repo"),
            url: attr("data-url"),
        }
    }

    /// Write the call to action onto a card that has none yet.
    fn route_card(card: &Element) -> Result<(), JsValue> {
        if card.has_attribute("data-href") {
            return Ok(());
        }
        let cta = project_of(card).cta();
        let Some(href) = cta.href else {
            return Ok(());
        };
        card.set_attribute("data-href", &href)?;
        card.set_attribute("data-external", if cta.external { "true" } else { "false" })?;
        if let Some(link) = card.query_selector(LINK_SELECTOR)? {
            link.set_attribute("href", &href)?;
            link.set_text_content(Some(cta.label));
            if cta.external {
                link.set_attribute("target", "_blank")?;
                link.set_attribute("rel", "noopener")?;
            }
        }
        Ok(())
    }

    fn open_card(event: &MouseEvent) {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        // The link navigates on its own.
        if target.closest(LINK_SELECTOR).unwrap_or_default().is_some() {
            return;
        }
        let Some(card) = target.closest(CARD_SELECTOR).unwrap_or_default() else {
            return;
        };
        let Some(href) = present(card.get_attribute("data-href").as_deref()).map(str::to_owned) else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        let result = if card.get_attribute("data-external").as_deref() == Some("true") {
            window.open_with_url_and_target(&href, "_blank").map(drop)
        } else {
            window.location().set_href(&href)
        };
        if let Err(err) = result {
            log::warn!("projects: navigation to {href} failed: {err:?}");
        }
    }

    /// Show only cards matching `filter` and update the count label.
    fn apply_filter(document: &Document, grid: &Element, filter: &StatusFilter) {
        let cards = elements(grid, CARD_SELECTOR);
        let mut shown = 0;
        for card in &cards {
            let visible = filter.matches(Some(&project_of(card).status));
            if let Some(card) = card.dyn_ref::<HtmlElement>() {
                card.set_hidden(!visible);
            }
            shown += usize::from(visible);
        }
        if let Some(count) = document.get_element_by_id(COUNT_ID) {
            count.set_text_content(Some(&filter.count_label(shown, cards.len())));
        }
    }

    fn listen(target: &Element, event: &str, handler: Box<dyn FnMut(MouseEvent)>) {
        let closure = Closure::wrap(handler);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            // Lives as long as the page.
            Ok(()) => closure.forget(),
            Err(err) => log::warn!("projects: failed to listen for {event}: {err:?}"),
        }
    }

    /// Route every card in `grid` and wire the filter buttons in `document`.
    pub fn attach(document: &Document, grid: &Element) {
        for card in elements(grid, CARD_SELECTOR) {
            if let Err(err) = route_card(&card) {
                log::warn!("projects: failed to route card: {err:?}");
            }
        }
        listen(grid, "click", Box::new(|event: MouseEvent| open_card(&event)));

        let Some(root) = document.document_element() else {
            return;
        };
        let buttons = elements(&root, FILTER_SELECTOR);
        for button in &buttons {
            let buttons = buttons.clone();
            let button_el = button.clone();
            let document = document.clone();
            let grid = grid.clone();
            listen(
                button,
                "click",
                Box::new(move |_: MouseEvent| {
                    for other in &buttons {
                        if let Err(err) = other.class_list().remove_1(ACTIVE_CLASS) {
                            log::warn!("projects: class update failed: {err:?}");
                        }
                    }
                    if let Err(err) = button_el.class_list().add_1(ACTIVE_CLASS) {
                        log::warn!("projects: class update failed: {err:?}");
                    }
                    let next = StatusFilter::parse(button_el.get_attribute("data-filter").as_deref());
                    log::debug!("projects: filter {next}");
                    apply_filter(&document, &grid, &next);
                }),
            );
        }
        apply_filter(document, grid, &StatusFilter::All);
        log::debug!("projects: {} filter buttons", buttons.len());
    }
}
