use article_filter::{ArticleController, ArticleFilter, ArticleQuery, ArticleSort, CategorySelection, ALL_CATEGORIES};
use utils_common::{Article, DetailValue, MemorySurface, ViewConfig};

const ARTICLES: &str = r#"{"articles": [
    {"id": 1, "title": "Spring Gardens", "description": "Planting guide", "content": "<p>Soil first.</p>",
     "author": "Mia", "category": "garden", "publishDate": "2024-03-10", "readTime": "6 min read", "image": "a.jpg"},
    {"id": 2, "title": "Night Trains", "description": "Across Europe", "content": "<p>Sleeper cars.</p>",
     "author": "Leo", "category": "travel", "publishDate": "2023-11-02", "readTime": "12 min read", "image": "b.jpg"},
    {"id": 3, "title": "Compost Basics", "description": "Less waste", "content": "<p>Greens and browns.</p>",
     "author": "Mia", "category": "garden", "publishDate": "2024-01-20", "readTime": "4 min read", "image": "c.jpg"}
]}"#;

fn loaded(sort: Option<ArticleSort>) -> ArticleController<MemorySurface> {
    let mut controller = ArticleController::new(ViewConfig::articles(), MemorySurface::new(), sort);
    controller.load(ARTICLES.as_bytes()).unwrap();
    controller
}

#[test]
fn oldest_first_with_full_count() {
    let controller = loaded(Some(ArticleSort::Oldest));
    let surface = controller.surface();

    assert_eq!(surface.card_ids(), vec![2, 3, 1]);
    assert_eq!(surface.count, Some(3));
    assert_eq!(surface.bound_actions, vec![2, 3, 1]);
}

#[test]
fn initial_render_without_sort_keeps_source_order() {
    let controller = loaded(None);
    assert_eq!(controller.surface().card_ids(), vec![1, 2, 3]);
}

#[test]
fn every_event_rebuilds_the_grid() {
    let mut controller = loaded(Some(ArticleSort::Newest));
    assert_eq!(controller.surface().card_ids(), vec![1, 3, 2]);

    controller.set_sort("readTime");
    assert_eq!(controller.surface().card_ids(), vec![2, 1, 3]);

    controller.set_query("  MIA ");
    assert_eq!(controller.surface().card_ids(), vec![1, 3]);
    assert_eq!(controller.surface().count, Some(2));

    controller.toggle_category("travel", true);
    assert!(controller.surface().cards.is_empty());
    assert_eq!(controller.surface().count, Some(0));
    assert_eq!(
        controller.surface().message_text(),
        Some("No articles found matching your criteria.")
    );

    controller.set_query("");
    assert_eq!(controller.surface().card_ids(), vec![2]);
    assert_eq!(controller.surface().bind_generation, 4);
}

#[test]
fn category_checkboxes_follow_the_all_rule() {
    let mut controller = loaded(None);

    controller.toggle_category("garden", true);
    assert!(!controller.categories().is_checked(ALL_CATEGORIES));
    assert_eq!(controller.surface().card_ids(), vec![1, 3]);

    controller.toggle_category("garden", false);
    assert_eq!(controller.categories(), &CategorySelection::All);
    assert_eq!(controller.surface().card_ids(), vec![1, 2, 3]);

    controller.toggle_category("travel", true);
    controller.toggle_category(ALL_CATEGORIES, true);
    assert_eq!(controller.surface().card_ids(), vec![1, 2, 3]);
}

#[test]
fn load_failure_shows_error_and_leaves_count_alone() {
    let mut controller = ArticleController::new(ViewConfig::articles(), MemorySurface::new(), None);
    controller.fail_load("network unreachable");

    let surface = controller.surface();
    assert_eq!(surface.message_text(), Some("Error loading articles. Please try again later."));
    assert_eq!(surface.count, None);
    assert!(surface.cards.is_empty());

    // 失败后的输入事件不会改动网格
    controller.set_query("anything");
    assert_eq!(
        controller.surface().message_text(),
        Some("Error loading articles. Please try again later.")
    );
}

#[test]
fn malformed_payload_is_a_load_failure() {
    let mut controller = ArticleController::new(ViewConfig::articles(), MemorySurface::new(), None);
    assert!(controller.load(br#"{"recipes": []}"#).is_err());
    assert_eq!(
        controller.surface().message_text(),
        Some("Error loading articles. Please try again later.")
    );
    assert!(controller.visible().is_empty());
}

#[test]
fn detail_opens_and_closes() {
    let mut controller = loaded(None);

    assert!(controller.open_detail(2));
    let surface = controller.surface();
    assert!(surface.overlay_visible);
    assert!(surface.scroll_locked);
    assert_eq!(surface.detail["author"], DetailValue::Text("By Leo".to_string()));
    assert_eq!(surface.detail["content"], DetailValue::Html("<p>Sleeper cars.</p>".to_string()));

    controller.close_detail();
    assert!(!controller.surface().overlay_visible);
    assert!(!controller.surface().scroll_locked);
}

#[test]
fn detail_for_unknown_id_is_ignored() {
    let mut controller = loaded(None);
    assert!(!controller.open_detail(42));
    assert!(!controller.surface().overlay_visible);
    assert!(controller.surface().detail.is_empty());
}

#[test]
fn filter_output_is_an_ordered_subsequence() {
    let document: serde_json::Value = serde_json::from_str(ARTICLES).unwrap();
    let catalog: Vec<Article> = serde_json::from_value(document["articles"].clone()).unwrap();

    let selections = [
        CategorySelection::All,
        CategorySelection::from_values(["garden"]),
        CategorySelection::from_values(["travel", "garden"]),
        CategorySelection::from_values(["cooking"]),
    ];
    for categories in selections {
        for text in ["", "mia", "e", "zzz"] {
            let query = ArticleQuery::new(text, categories.clone());
            let result = ArticleFilter::filter_articles(&catalog, &query);
            let positions: Vec<usize> = result
                .iter()
                .map(|a| catalog.iter().position(|c| c.id == a.id).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn unsubmitted_search_text_applies_on_category_and_sort_change() {
    let mut controller = loaded(None);
    let before = controller.surface().bind_generation;

    // 搜索框中输入 "mia" 但未提交，随后勾选分类
    controller.toggle_category_with_text("mia", "garden", true);
    assert_eq!(controller.surface().card_ids(), vec![1, 3]);
    assert_eq!(controller.surface().bind_generation, before + 1);

    controller.set_sort_with_text("  Compost ", "oldest");
    assert_eq!(controller.surface().card_ids(), vec![3]);
    assert_eq!(controller.surface().count, Some(1));

    controller.toggle_category_with_text("leo", "travel", true);
    assert_eq!(controller.surface().card_ids(), vec![2]);
}

#[test]
fn empty_result_releases_card_actions() {
    let mut controller = loaded(None);
    assert_eq!(controller.surface().bound_actions, vec![1, 2, 3]);

    controller.set_query("nothing matches this");
    assert!(controller.surface().bound_actions.is_empty());
    assert_eq!(controller.surface().count, Some(0));
}

#[test]
fn malformed_display_fields_still_load() {
    let payload = br#"{"articles": [
        {"id": 1, "title": "Spring Gardens", "category": "garden", "publishDate": "2024-03-10", "readTime": "6 min read"},
        {"id": 2, "title": "Night Trains", "category": "travel", "image": null, "readTime": 12, "author": null}
    ]}"#;
    let mut controller = ArticleController::new(ViewConfig::articles(), MemorySurface::new(), Some(ArticleSort::ReadTime));

    assert_eq!(controller.load(payload).unwrap(), 2);
    assert_eq!(controller.surface().card_ids(), vec![2, 1]);
    assert_eq!(controller.surface().message_text(), None);

    assert!(controller.open_detail(2));
    assert_eq!(
        controller.surface().detail["image"],
        DetailValue::Image { src: String::new(), alt: "Night Trains".to_string() }
    );
    assert_eq!(controller.surface().detail["read_time"], DetailValue::Text("12".to_string()));
}

#[test]
fn visible_matches_the_rendered_grid() {
    let mut controller = loaded(Some(ArticleSort::Newest));
    controller.toggle_category("garden", true);
    let visible: Vec<u32> = controller.visible().iter().map(|a| a.id).collect();
    assert_eq!(visible, controller.surface().card_ids());
    assert_eq!(visible, vec![1, 3]);
}
