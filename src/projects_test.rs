use super::*;

fn project(id: &str, status: &str) -> Project {
    Project { id: id.to_owned(), status: status.to_owned(), ..Project::default() }
}

fn with_links(repo: Option<&str>, url: Option<&str>) -> Project {
    Project { repo: repo.map(str::to_owned), url: url.map(str::to_owned), ..project("p", "active") }
}

// =============================================================
// Card routing
// =============================================================

#[test]
fn detail_content_routes_to_project_page() {
    let p = Project { has_detail: true, ..with_links(Some("https://git/x"), Some("https://x.dev")) };
    assert_eq!(p.kind(), CardKind::Project);
    assert_eq!(
        p.cta(),
        CardCta { label: "View →", href: Some("/project.html?id=p".to_owned()), external: false }
    );
}

#[test]
fn repo_without_url_routes_to_repo() {
    let p = with_links(Some("https://git/x"), None);
    assert_eq!(p.kind(), CardKind::Repo);
    assert_eq!(p.cta(), CardCta { label: "Repo →", href: Some("https://git/x".to_owned()), external: true });
}

#[test]
fn url_wins_over_repo_for_external_cards() {
    let p = with_links(Some("https://git/x"), Some("https://x.dev"));
    assert_eq!(p.kind(), CardKind::External);
    assert_eq!(p.cta(), CardCta { label: "Link →", href: Some("https://x.dev".to_owned()), external: true });
}

#[test]
fn card_without_links_has_no_href() {
    let p = with_links(None, None);
    assert_eq!(p.kind(), CardKind::External);
    assert_eq!(p.cta().href, None);
}

#[test]
fn absent_values_are_normalized() {
    assert_eq!(present(None), None);
    assert_eq!(present(Some("")), None);
    assert_eq!(present(Some(" null ")), None);
    assert_eq!(present(Some("undefined")), None);
    assert_eq!(present(Some(" /a ")), Some("/a"));
}

#[test]
fn status_is_read_from_modifier_class() {
    assert_eq!(status_from_classes("card__status card__status--active"), Some("active"));
    assert_eq!(status_from_classes("card__status--wip  other"), Some("wip"));
    assert_eq!(status_from_classes("card__status"), None);
    assert_eq!(status_from_classes("card__status--"), None);
}

// =============================================================
// Filtering
// =============================================================

#[test]
fn filter_parses_all_and_statuses() {
    assert_eq!(StatusFilter::parse(None), StatusFilter::All);
    assert_eq!(StatusFilter::parse(Some("all")), StatusFilter::All);
    assert_eq!(StatusFilter::parse(Some("archived")), StatusFilter::Only("archived".to_owned()));
}

#[test]
fn filter_keeps_matching_status_in_order() {
    let projects = vec![project("a", "active"), project("b", "archived"), project("c", "active")];
    let shown = StatusFilter::parse(Some("active")).apply(&projects);
    let ids: Vec<&str> = shown.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(StatusFilter::All.apply(&projects).len(), 3);
}

#[test]
fn status_filter_rejects_unknown_status() {
    let filter = StatusFilter::Only("active".to_owned());
    assert!(!filter.matches(None));
    assert!(!filter.matches(Some("archived")));
    assert!(StatusFilter::All.matches(None));
}

#[test]
fn unfiltered_count_pluralizes() {
    assert_eq!(StatusFilter::All.count_label(0, 0), "0 projects");
    assert_eq!(StatusFilter::All.count_label(1, 1), "1 project");
    assert_eq!(StatusFilter::All.count_label(3, 3), "3 projects");
}

#[test]
fn filtered_count_shows_share_of_total() {
    let filter = StatusFilter::Only("active".to_owned());
    assert_eq!(filter.count_label(1, 4), "1/4 projects");
    assert_eq!(filter.count_label(0, 4), "0/4 projects");
}

#[test]
fn filter_displays_its_name() {
    assert_eq!(StatusFilter::All.to_string(), "all");
    assert_eq!(StatusFilter::Only("wip".to_owned()).to_string(), "wip");
}
