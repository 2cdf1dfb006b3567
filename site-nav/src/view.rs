use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, Node, ScrollBehavior, ScrollToOptions, Window};

use utils_common::dom::{self, Listener};
use utils_common::logging;

use crate::chrome::{self, MenuState, ScrollState};
use crate::config::NavConfig;

const ACTIVE_CLASS: &str = "active";
const SCROLLED_CLASS: &str = "scrolled";
const IN_VIEW_CLASS: &str = "in-view";

/// 页面骨架中用到的元素，以及菜单状态
struct Chrome {
    window: Window,
    document: Document,
    config: NavConfig,
    header: Option<HtmlElement>,
    site_title: Option<Element>,
    menu_button: Option<Element>,
    nav: Option<Element>,
    links: Vec<Element>,
    sections: Vec<HtmlElement>,
    steps: Vec<Element>,
    menu: MenuState,
}

impl Chrome {
    fn collect(window: Window, document: Document, config: NavConfig) -> Result<Self, JsValue> {
        let header = select(&document, &config.header).and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let site_title = select(&document, &config.site_title);
        let menu_button = select(&document, &config.menu_button);
        let nav = select(&document, &config.nav);
        let links = dom::select_all(&document, &config.nav_links)?;
        let sections = dom::select_all(&document, &config.sections)?
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
            .collect();
        let steps = dom::select_all(&document, &config.steps)?;

        Ok(Self {
            window,
            document,
            config,
            header,
            site_title,
            menu_button,
            nav,
            links,
            sections,
            steps,
            menu: MenuState::default(),
        })
    }

    fn render_menu(&self) {
        if let Some(nav) = &self.nav {
            set_class(nav, ACTIVE_CLASS, self.menu.is_open());
        }
        if let Some(button) = &self.menu_button {
            button.set_text_content(Some(self.menu.glyph()));
        }
    }

    fn toggle_menu(&mut self) {
        self.menu.toggle();
        self.render_menu();
    }

    fn follow_link(&mut self, link: &Element) {
        self.activate_link(link);
        self.menu.follow_link(self.viewport_width());
        self.render_menu();
    }

    /// 点击落在菜单和菜单按钮之外时收起菜单
    fn click_outside(&mut self, target: Option<&Node>) {
        let inside = |el: &Option<Element>| el.as_ref().map_or(false, |el| el.contains(target));
        if inside(&self.nav) || inside(&self.menu_button) {
            return;
        }
        self.menu.close();
        self.render_menu();
    }

    fn on_scroll(&self) {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let sections: Vec<(String, f64)> = self
            .sections
            .iter()
            .map(|section| (section.id(), f64::from(section.offset_top())))
            .collect();
        let state = ScrollState::compute(scroll_y, sections.iter().map(|(id, top)| (id.as_str(), *top)));

        if let Some(header) = &self.header {
            set_class(header, SCROLLED_CLASS, state.header_scrolled);
        }
        if let Some(title) = &self.site_title {
            set_class(title, SCROLLED_CLASS, state.header_scrolled);
        }
        for link in &self.links {
            let href = link.get_attribute("href").unwrap_or_default();
            set_class(link, ACTIVE_CLASS, state.is_active_link(&href));
        }

        self.reveal_steps();
    }

    /// 已进入视口的步骤加上 in-view，之后不再移除
    fn reveal_steps(&self) {
        let inner_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        for step in &self.steps {
            if chrome::step_in_view(step.get_bounding_client_rect().top(), inner_height) {
                set_class(step, IN_VIEW_CLASS, true);
            }
        }
    }

    fn scroll_to_anchor(&self, href: &str) {
        let Some(selector) = chrome::anchor_target(href) else {
            return;
        };
        let Some(target) = select(&self.document, selector) else {
            return;
        };

        let header_height = self.header.as_ref().map_or(0.0, |h| f64::from(h.offset_height()));
        let top = chrome::scroll_target(
            target.get_bounding_client_rect().top(),
            self.window.page_y_offset().unwrap_or(0.0),
            header_height,
        );

        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn activate_link(&self, active: &Element) {
        for link in &self.links {
            set_class(link, ACTIVE_CLASS, false);
        }
        set_class(active, ACTIVE_CLASS, true);
    }

    fn set_initial_active(&self) {
        let hash = self.window.location().hash().unwrap_or_default();
        let href = chrome::initial_active_href(&hash, &self.config.default_href);
        let found = self
            .links
            .iter()
            .find(|link| link.get_attribute("href").as_deref() == Some(href));
        match found {
            Some(link) => self.activate_link(link),
            None => logging::warn(&format!("导航中没有指向 {} 的链接", href)),
        }
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0)
    }
}

/// 页面骨架 - 页头、移动端菜单、区块高亮、步骤动画
#[wasm_bindgen]
pub struct SiteNav {
    chrome: Rc<RefCell<Chrome>>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl SiteNav {
    /// `config_json` 可覆盖默认选择器
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<SiteNav, JsValue> {
        let config = match config_json {
            Some(json) => NavConfig::from_json(&json)
                .map_err(|e| JsValue::from_str(&format!("解析导航配置失败: {}", e)))?,
            None => NavConfig::default(),
        };

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("无法获取 window"))?;
        let document = dom::document()?;
        let chrome = Rc::new(RefCell::new(Chrome::collect(window.clone(), document.clone(), config)?));
        let listeners = bind_chrome(&window, &document, &chrome)?;

        {
            let chrome = chrome.borrow();
            chrome.set_initial_active();
            chrome.reveal_steps();
        }

        Ok(SiteNav {
            chrome,
            _listeners: listeners,
        })
    }

    pub fn menu_open(&self) -> bool {
        self.chrome.borrow().menu.is_open()
    }

    /// 按当前滚动位置重新计算页头和高亮
    pub fn sync(&self) {
        self.chrome.borrow().on_scroll();
    }
}

fn bind_chrome(
    window: &Window,
    document: &Document,
    chrome: &Rc<RefCell<Chrome>>,
) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::new();
    let (config, links, menu_button) = {
        let c = chrome.borrow();
        (c.config.clone(), c.links.clone(), c.menu_button.clone())
    };

    let shared = chrome.clone();
    listeners.push(dom::listen(window, "scroll", move |_| {
        with_chrome(&shared, |c| c.on_scroll());
    })?);

    let shared = chrome.clone();
    listeners.push(dom::listen(window, "load", move |_| {
        with_chrome(&shared, |c| c.reveal_steps());
    })?);

    if let Some(button) = &menu_button {
        let shared = chrome.clone();
        listeners.push(dom::listen(button, "click", move |_| {
            with_chrome(&shared, |c| c.toggle_menu());
        })?);
    }

    for link in links {
        let shared = chrome.clone();
        let target = link.clone();
        listeners.push(dom::listen(&link, "click", move |_| {
            with_chrome(&shared, |c| c.follow_link(&target));
        })?);
    }

    let shared = chrome.clone();
    listeners.push(dom::listen(document, "click", move |event: Event| {
        let target = event.target();
        let node = target.as_ref().and_then(|t| t.dyn_ref::<Node>());
        with_chrome(&shared, |c| c.click_outside(node));
    })?);

    for anchor in dom::select_all(document, &config.anchors)? {
        let shared = chrome.clone();
        let href = anchor.get_attribute("href").unwrap_or_default();
        listeners.push(dom::listen(&anchor, "click", move |event: Event| {
            event.prevent_default();
            with_chrome(&shared, |c| c.scroll_to_anchor(&href));
        })?);
    }

    if let Some(video) = select(document, &config.hero_video) {
        listeners.push(dom::listen(&video, "loadeddata", |_| {
            logging::log("Hero video loaded successfully");
        })?);
        listeners.push(dom::listen(&video, "error", |_| {
            logging::error("Error loading hero video");
        })?);
    }

    Ok(listeners)
}

fn with_chrome(chrome: &Rc<RefCell<Chrome>>, action: impl FnOnce(&mut Chrome)) {
    match chrome.try_borrow_mut() {
        Ok(mut chrome) => action(&mut chrome),
        Err(_) => logging::warn("页面骨架正在处理其它事件，忽略本次输入"),
    };
}

fn select(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

fn set_class(element: &Element, class_name: &str, on: bool) {
    if let Err(e) = element.class_list().toggle_with_force(class_name, on) {
        logging::error(&format!("更新 class 失败: {:?}", e));
    }
}
