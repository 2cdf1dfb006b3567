use site_nav::chrome::{self, MenuState, ScrollState};

const SECTIONS: [(&str, f64); 4] = [("home", 0.0), ("recipes", 900.0), ("how-it-works", 1700.0), ("contact", 2600.0)];

#[test]
fn scrolling_down_walks_through_sections() {
    let mut seen = Vec::new();
    let mut y = 0.0;
    while y <= 3000.0 {
        let state = ScrollState::compute(y, SECTIONS);
        if let Some(id) = state.active_section {
            if seen.last() != Some(&id) {
                seen.push(id);
            }
        }
        y += 25.0;
    }
    assert_eq!(seen, vec!["home", "recipes", "how-it-works", "contact"]);
}

#[test]
fn exactly_one_link_is_active_once_a_section_is_reached() {
    let hrefs = ["#home", "#recipes", "#how-it-works", "#contact", "articles.html"];
    for y in [0.0, 720.0, 1500.0, 2450.0, 9000.0] {
        let state = ScrollState::compute(y, SECTIONS);
        let active = hrefs.iter().filter(|href| state.is_active_link(href)).count();
        assert_eq!(active, 1, "scroll position {}", y);
    }
}

#[test]
fn menu_survives_desktop_link_clicks() {
    let mut menu = MenuState::default();
    menu.toggle();
    for width in [1440.0, 1024.0, 769.0] {
        menu.follow_link(width);
        assert_eq!(menu.glyph(), chrome::MENU_OPEN_GLYPH);
    }
    menu.follow_link(375.0);
    assert_eq!(menu.glyph(), chrome::MENU_CLOSED_GLYPH);

    // 点击页面其它位置
    menu.toggle();
    menu.close();
    assert!(!menu.is_open());
}
