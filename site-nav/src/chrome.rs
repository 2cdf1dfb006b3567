//! 页面骨架的状态计算，不依赖 DOM

/// 超过该滚动距离后页头收起
pub const SCROLLED_THRESHOLD: f64 = 50.0;
/// 视口宽度不超过该值时视为移动端布局
pub const MOBILE_BREAKPOINT: f64 = 768.0;
/// 区块顶部提前多少像素算作进入
pub const SECTION_OFFSET: f64 = 200.0;
/// 步骤顶部进入视口高度的 1/1.3 以内即显示
pub const STEP_REVEAL_RATIO: f64 = 1.3;

pub const MENU_CLOSED_GLYPH: &str = "☰";
pub const MENU_OPEN_GLYPH: &str = "✕";

/// 移动端菜单
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// 点击导航链接后；只有移动端布局才收起菜单
    pub fn follow_link(&mut self, viewport_width: f64) {
        if viewport_width <= MOBILE_BREAKPOINT {
            self.close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// 菜单按钮上显示的字符
    pub fn glyph(&self) -> &'static str {
        if self.open {
            MENU_OPEN_GLYPH
        } else {
            MENU_CLOSED_GLYPH
        }
    }
}

/// 一次滚动后的页面状态
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    pub header_scrolled: bool,
    /// 当前所在区块的 id；还没有进入任何区块时为 None
    pub active_section: Option<String>,
}

impl ScrollState {
    /// `sections` 为按文档顺序排列的 (id, offsetTop)
    pub fn compute<'a, I>(scroll_y: f64, sections: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        Self {
            header_scrolled: header_scrolled(scroll_y),
            active_section: active_section(scroll_y, sections).map(str::to_string),
        }
    }

    /// 该链接是否应高亮
    pub fn is_active_link(&self, href: &str) -> bool {
        match &self.active_section {
            Some(id) => href.strip_prefix('#') == Some(id.as_str()),
            None => false,
        }
    }
}

pub fn header_scrolled(scroll_y: f64) -> bool {
    scroll_y > SCROLLED_THRESHOLD
}

/// 最后一个 `offsetTop - 200 <= scroll_y` 的区块
pub fn active_section<'a, I>(scroll_y: f64, sections: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    sections
        .into_iter()
        .filter(|(_, top)| scroll_y >= top - SECTION_OFFSET)
        .last()
        .map(|(id, _)| id)
}

/// 页内锚点的目标选择器；单独的 "#" 以及非页内链接返回 None
pub fn anchor_target(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some(rest) if !rest.is_empty() => Some(href),
        _ => None,
    }
}

/// 平滑滚动的目标位置，扣除固定页头的高度
pub fn scroll_target(rect_top: f64, page_y_offset: f64, header_height: f64) -> f64 {
    rect_top + page_y_offset - header_height
}

/// 初始高亮的链接：有 hash 时跟随 hash，否则为默认链接
pub fn initial_active_href<'a>(hash: &'a str, default_href: &'a str) -> &'a str {
    if hash.is_empty() || hash == "#" {
        default_href
    } else {
        hash
    }
}

pub fn step_in_view(rect_top: f64, inner_height: f64) -> bool {
    rect_top < inner_height / STEP_REVEAL_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_collapses_past_threshold() {
        assert!(!header_scrolled(0.0));
        assert!(!header_scrolled(50.0));
        assert!(header_scrolled(50.5));
    }

    #[test]
    fn menu_glyph_follows_state() {
        let mut menu = MenuState::default();
        assert_eq!(menu.glyph(), "☰");
        menu.toggle();
        assert!(menu.is_open());
        assert_eq!(menu.glyph(), "✕");
        menu.toggle();
        assert_eq!(menu.glyph(), "☰");
    }

    #[test]
    fn link_closes_menu_only_on_narrow_viewports() {
        let mut menu = MenuState::default();
        menu.toggle();
        menu.follow_link(1024.0);
        assert!(menu.is_open());
        menu.follow_link(768.0);
        assert!(!menu.is_open());
    }

    #[test]
    fn last_reached_section_wins() {
        let sections = [("home", 0.0), ("about", 800.0), ("contact", 1600.0)];
        assert_eq!(active_section(0.0, sections), Some("home"));
        assert_eq!(active_section(599.0, sections), Some("home"));
        assert_eq!(active_section(600.0, sections), Some("about"));
        assert_eq!(active_section(5000.0, sections), Some("contact"));
        assert_eq!(active_section(0.0, [("late", 900.0)]), None);
    }

    #[test]
    fn scroll_state_marks_matching_link() {
        let state = ScrollState::compute(700.0, [("home", 0.0), ("about", 800.0)]);
        assert!(state.header_scrolled);
        assert!(state.is_active_link("#about"));
        assert!(!state.is_active_link("#home"));
        assert!(!state.is_active_link("about"));

        let none = ScrollState::compute(0.0, [("about", 800.0)]);
        assert!(!none.is_active_link("#"));
    }

    #[test]
    fn anchors_and_offsets() {
        assert_eq!(anchor_target("#about"), Some("#about"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("/articles.html"), None);
        assert_eq!(scroll_target(300.0, 1000.0, 80.0), 1220.0);
    }

    #[test]
    fn initial_link_defaults_to_home() {
        assert_eq!(initial_active_href("", "#home"), "#home");
        assert_eq!(initial_active_href("#contact", "#home"), "#contact");
    }

    #[test]
    fn steps_reveal_below_the_fold_line() {
        assert!(step_in_view(100.0, 1300.0));
        assert!(!step_in_view(1000.0, 1300.0));
        assert!(step_in_view(-50.0, 800.0));
    }
}
