use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlInputElement, KeyboardEvent};

use utils_common::dom::{self, DomDetail, DomGrid, Listener};
use utils_common::logging;
use utils_common::{Card, DetailSurface, DetailValue, GridSurface, ViewConfig};

use crate::controller::{ArticleController, ArticleSurface};
use crate::models::{ArticleSort, CategorySelection};

/// 页面上的文章展示面
pub struct DomArticleSurface {
    grid: DomGrid,
    detail: DomDetail,
    checkboxes: Vec<HtmlInputElement>,
}

impl GridSurface for DomArticleSurface {
    fn clear(&mut self) {
        self.grid.clear();
    }

    fn show_message(&mut self, class_name: &str, message: &str) {
        self.grid.show_message(class_name, message);
    }

    fn append_card(&mut self, card: &Card) {
        self.grid.append_card(card);
    }

    fn set_count(&mut self, count: usize) {
        self.grid.set_count(count);
    }

    fn bind_open_actions(&mut self, action_class: &str, ids: &[u32]) {
        self.grid.bind_open_actions(action_class, ids);
    }
}

impl DetailSurface for DomArticleSurface {
    fn fill(&mut self, slot: &str, value: &DetailValue) {
        self.detail.fill(slot, value);
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        self.detail.set_overlay_visible(visible);
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.detail.set_scroll_locked(locked);
    }
}

impl ArticleSurface for DomArticleSurface {
    fn reflect_categories(&mut self, selection: &CategorySelection) {
        for checkbox in &self.checkboxes {
            checkbox.set_checked(selection.is_checked(&checkbox.value()));
        }
    }
}

type SharedController = Rc<RefCell<ArticleController<DomArticleSurface>>>;

/// 文章页 - 挂载到现有页面结构上
///
/// 由页面脚本获取 `data_url()` 指向的数据，成功时调用 `load`，失败时调用 `fail_load`。
/// 事件绑定随对象存在，对象释放后页面控件不再响应。
#[wasm_bindgen]
pub struct ArticleView {
    controller: SharedController,
    config: ViewConfig,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl ArticleView {
    /// `config_json` 可覆盖默认配置中的部分字段
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ArticleView, JsValue> {
        let mut config = ViewConfig::articles();
        if let Some(json) = config_json {
            config = config
                .with_overrides(&json)
                .map_err(|e| JsValue::from_str(&format!("解析视图配置失败: {}", e)))?;
        }

        let document = dom::document()?;
        let detail = DomDetail::new(&document, &config)?;
        let overlay = detail.overlay().clone();
        let surface = DomArticleSurface {
            grid: DomGrid::new(&document, &config)?,
            detail,
            checkboxes: dom::checkboxes(&document, &config.checkbox_selector)?,
        };

        let sort = ArticleSort::from_value(&dom::control_value(&document, &config.sort_id));
        let controller = Rc::new(RefCell::new(ArticleController::new(config.clone(), surface, sort)));

        let weak = Rc::downgrade(&controller);
        controller
            .borrow_mut()
            .surface_mut()
            .grid
            .set_open_handler(Rc::new(move |id: u32| {
                with_controller(&weak, |c| {
                    c.open_detail(id);
                });
            }));

        let mut all_listeners = bind_inputs(&document, &config, &controller)?;

        let weak = Rc::downgrade(&controller);
        all_listeners.extend(dom::bind_overlay_close(
            &document,
            &config,
            &overlay,
            Rc::new(move || with_controller(&weak, |c| c.close_detail())),
        )?);

        Ok(ArticleView {
            controller,
            config,
            _listeners: all_listeners,
        })
    }

    /// 数据文件地址
    pub fn data_url(&self) -> String {
        self.config.data_url.clone()
    }

    /// 传入数据文件内容（JSON 或压缩快照），返回文章数量
    pub fn load(&self, data: &[u8]) -> Result<usize, JsValue> {
        self.controller
            .borrow_mut()
            .load(data)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// 数据获取失败
    pub fn fail_load(&self, reason: &str) {
        self.controller.borrow_mut().fail_load(reason);
    }

    /// 打开指定文章的详情，ID不存在时返回 false
    pub fn open(&self, id: u32) -> bool {
        self.controller.borrow_mut().open_detail(id)
    }

    pub fn close(&self) {
        self.controller.borrow_mut().close_detail();
    }

    /// 当前显示的文章ID，按显示顺序
    pub fn visible_ids(&self) -> Vec<u32> {
        self.controller
            .borrow()
            .visible()
            .iter()
            .map(|article| article.id)
            .collect()
    }

    /// 当前显示的文章列表
    pub fn visible_articles(&self) -> Result<JsValue, JsValue> {
        let controller = self.controller.borrow();
        serde_wasm_bindgen::to_value(&controller.visible())
            .map_err(|e| JsValue::from_str(&format!("序列化文章失败: {}", e)))
    }
}

// 搜索框、搜索按钮、排序下拉框、分类复选框
fn bind_inputs(
    document: &Document,
    config: &ViewConfig,
    controller: &SharedController,
) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::new();

    let search = {
        let weak = Rc::downgrade(controller);
        let document = document.clone();
        let input_id = config.text_input_id.clone();
        Rc::new(move || {
            let text = dom::control_value(&document, &input_id);
            with_controller(&weak, |c| c.set_query(&text));
        })
    };

    let button = dom::element_by_id(document, &config.text_button_id)?;
    let on_click = search.clone();
    listeners.push(dom::listen(&button, "click", move |_| on_click())?);

    let input = dom::element_by_id(document, &config.text_input_id)?;
    let on_enter = search;
    listeners.push(dom::listen(&input, "keypress", move |event: Event| {
        let is_enter = event
            .dyn_ref::<KeyboardEvent>()
            .map_or(false, |key| key.key() == "Enter");
        if is_enter {
            on_enter();
        }
    })?);

    let select = dom::element_by_id(document, &config.sort_id)?;
    {
        let weak = Rc::downgrade(controller);
        let document = document.clone();
        let sort_id = config.sort_id.clone();
        let input_id = config.text_input_id.clone();
        listeners.push(dom::listen(&select, "change", move |_| {
            let text = dom::control_value(&document, &input_id);
            let value = dom::control_value(&document, &sort_id);
            with_controller(&weak, |c| c.set_sort_with_text(&text, &value));
        })?);
    }

    for checkbox in dom::checkboxes(document, &config.checkbox_selector)? {
        let weak = Rc::downgrade(controller);
        let document = document.clone();
        let input_id = config.text_input_id.clone();
        let target = checkbox.clone();
        listeners.push(dom::listen(&checkbox, "change", move |_| {
            let text = dom::control_value(&document, &input_id);
            let value = target.value();
            let checked = target.checked();
            with_controller(&weak, |c| c.toggle_category_with_text(&text, &value, checked));
        })?);
    }

    Ok(listeners)
}

fn with_controller(
    weak: &Weak<RefCell<ArticleController<DomArticleSurface>>>,
    action: impl FnOnce(&mut ArticleController<DomArticleSurface>),
) {
    let Some(controller) = weak.upgrade() else {
        return;
    };
    match controller.try_borrow_mut() {
        Ok(mut controller) => action(&mut controller),
        Err(_) => logging::warn("文章页正在处理其它事件，忽略本次输入"),
    };
}
