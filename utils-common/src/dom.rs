//! 基于 web-sys 的展示面实现，以及视图共用的 DOM 小工具

use std::collections::BTreeMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, HtmlInputElement};

use crate::config::ViewConfig;
use crate::logging;
use crate::surface::{Card, DetailSurface, DetailValue, GridSurface};
use crate::text::escape_html;

/// 已注册的事件回调，释放即失效
pub type Listener = Closure<dyn FnMut(Event)>;

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("无法获取 document"))
}

pub fn element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("找不到元素 #{}", id)))
}

/// 注册事件回调，返回的 Listener 需要由调用方保存
pub fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Listener, JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    Ok(closure)
}

/// 选择器匹配到的全部元素
pub fn select_all(root: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = root.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// 选择器匹配到的全部复选框
pub fn checkboxes(document: &Document, selector: &str) -> Result<Vec<HtmlInputElement>, JsValue> {
    Ok(select_all(document, selector)?
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
        .collect())
}

/// 输入框或下拉框当前的值
pub fn control_value(document: &Document, id: &str) -> String {
    document
        .get_element_by_id(id)
        .and_then(|el| js_sys::Reflect::get(&el, &JsValue::from_str("value")).ok())
        .and_then(|value| value.as_string())
        .unwrap_or_default()
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        logging::error(&format!("设置样式 {} 失败: {:?}", property, e));
    }
}

/// 卡片网格
pub struct DomGrid {
    document: Document,
    grid: Element,
    count: Option<Element>,
    on_open: Option<Rc<dyn Fn(u32)>>,
    action_listeners: Vec<Listener>,
}

impl DomGrid {
    pub fn new(document: &Document, config: &ViewConfig) -> Result<Self, JsValue> {
        let count = match &config.count_id {
            Some(id) => Some(element_by_id(document, id)?),
            None => None,
        };
        Ok(Self {
            document: document.clone(),
            grid: element_by_id(document, &config.grid_id)?,
            count,
            on_open: None,
            action_listeners: Vec::new(),
        })
    }

    /// 设置卡片按钮点击后的处理函数
    pub fn set_open_handler(&mut self, handler: Rc<dyn Fn(u32)>) {
        self.on_open = Some(handler);
    }
}

impl GridSurface for DomGrid {
    fn clear(&mut self) {
        self.grid.set_inner_html("");
        // 按钮随网格一起移除，回调一并释放
        self.action_listeners.clear();
    }

    fn show_message(&mut self, class_name: &str, message: &str) {
        self.grid.set_inner_html(&format!(
            "<p class=\"{}\">{}</p>",
            escape_html(class_name),
            escape_html(message)
        ));
    }

    fn append_card(&mut self, card: &Card) {
        let element = match self.document.create_element("div") {
            Ok(element) => element,
            Err(e) => {
                logging::error(&format!("创建卡片失败: {:?}", e));
                return;
            }
        };
        element.set_class_name(card.class_name);
        element.set_inner_html(&card.inner_html);
        if let Err(e) = self.grid.append_child(&element) {
            logging::error(&format!("插入卡片失败: {:?}", e));
        }
    }

    fn set_count(&mut self, count: usize) {
        if let Some(label) = &self.count {
            label.set_text_content(Some(count.to_string().as_str()));
        }
    }

    fn bind_open_actions(&mut self, action_class: &str, ids: &[u32]) {
        self.action_listeners.clear();

        let Some(handler) = self.on_open.clone() else {
            return;
        };
        let buttons = match self.grid.query_selector_all(&format!(".{}", action_class)) {
            Ok(buttons) => buttons,
            Err(e) => {
                logging::error(&format!("查找卡片按钮失败: {:?}", e));
                return;
            }
        };

        for i in 0..buttons.length() {
            let Some(button) = buttons.item(i) else { continue };
            let id = button
                .dyn_ref::<Element>()
                .and_then(|el| el.get_attribute("data-id"))
                .and_then(|value| value.parse::<u32>().ok())
                .filter(|id| ids.contains(id));
            let Some(id) = id else { continue };

            let handler = handler.clone();
            match listen(&button, "click", move |_| handler(id)) {
                Ok(listener) => self.action_listeners.push(listener),
                Err(e) => logging::error(&format!("绑定卡片按钮失败: {:?}", e)),
            }
        }
    }
}

/// 详情弹窗
pub struct DomDetail {
    document: Document,
    overlay: HtmlElement,
    slots: BTreeMap<String, Element>,
    display: String,
}

impl DomDetail {
    pub fn new(document: &Document, config: &ViewConfig) -> Result<Self, JsValue> {
        let overlay = element_by_id(document, &config.overlay_id)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str("详情弹窗不是 HTML 元素"))?;

        let mut slots = BTreeMap::new();
        for (slot, id) in &config.detail_slots {
            match document.get_element_by_id(id) {
                Some(element) => {
                    slots.insert(slot.clone(), element);
                }
                None => logging::warn(&format!("详情槽位 {} 缺少元素 #{}", slot, id)),
            }
        }

        Ok(Self {
            document: document.clone(),
            overlay,
            slots,
            display: config.overlay_display.clone(),
        })
    }

    /// 弹窗本身（背景层）
    pub fn overlay(&self) -> &HtmlElement {
        &self.overlay
    }
}

impl DetailSurface for DomDetail {
    fn fill(&mut self, slot: &str, value: &DetailValue) {
        let Some(element) = self.slots.get(slot) else {
            return;
        };

        match value {
            DetailValue::Text(text) => element.set_text_content(Some(text.as_str())),
            DetailValue::Html(html) => element.set_inner_html(html),
            DetailValue::Image { src, alt } => {
                if let Some(image) = element.dyn_ref::<HtmlImageElement>() {
                    image.set_src(src);
                    image.set_alt(alt);
                }
            }
            DetailValue::List(items) => {
                element.set_inner_html("");
                for item in items {
                    match self.document.create_element("li") {
                        Ok(li) => {
                            li.set_text_content(Some(item.as_str()));
                            if let Err(e) = element.append_child(&li) {
                                logging::error(&format!("插入列表项失败: {:?}", e));
                            }
                        }
                        Err(e) => logging::error(&format!("创建列表项失败: {:?}", e)),
                    }
                }
            }
        }
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        let display = if visible { self.display.as_str() } else { "none" };
        set_style(&self.overlay, "display", display);
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        if let Some(body) = self.document.body() {
            set_style(&body, "overflow", if locked { "hidden" } else { "auto" });
        }
    }
}

/// 关闭按钮和点击背景层都会关闭弹窗
pub fn bind_overlay_close(
    document: &Document,
    config: &ViewConfig,
    overlay: &HtmlElement,
    on_close: Rc<dyn Fn()>,
) -> Result<Vec<Listener>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("无法获取 window"))?;
    let close_button = element_by_id(document, &config.close_id)?;

    let handler = on_close.clone();
    let by_button = listen(&close_button, "click", move |_| handler())?;

    let backdrop = overlay.clone();
    let by_backdrop = listen(&window, "click", move |event: Event| {
        let hit = event
            .target()
            .map_or(false, |target| js_sys::Object::is(&target, &backdrop));
        if hit {
            on_close();
        }
    })?;

    Ok(vec![by_button, by_backdrop])
}
