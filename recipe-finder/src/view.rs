use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement, KeyboardEvent};

use utils_common::dom::{self, DomDetail, DomGrid, Listener};
use utils_common::logging;
use utils_common::text::escape_html;
use utils_common::{Card, DetailSurface, DetailValue, GridSurface, ViewConfig};

use crate::controller::{RecipeController, RecipeSurface};
use crate::models::{CustomIngredient, IngredientSelection, RecipeSort};

/// 页面上的菜谱展示面
pub struct DomRecipeSurface {
    document: Document,
    grid: DomGrid,
    detail: DomDetail,
    custom_list: Option<Element>,
    custom_class: Option<String>,
    input: Option<HtmlInputElement>,
    on_toggle: Option<Rc<dyn Fn(String, bool)>>,
    custom_listeners: Vec<Listener>,
}

impl GridSurface for DomRecipeSurface {
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

impl DetailSurface for DomRecipeSurface {
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

impl RecipeSurface for DomRecipeSurface {
    fn append_ingredient(&mut self, ingredient: &CustomIngredient) {
        let Some(list) = &self.custom_list else {
            logging::warn("页面没有可追加自定义食材的列表");
            return;
        };

        let label = match self.document.create_element("label") {
            Ok(label) => label,
            Err(e) => {
                logging::error(&format!("创建食材选项失败: {:?}", e));
                return;
            }
        };
        if let Some(class_name) = &self.custom_class {
            label.set_class_name(class_name);
        }
        label.set_inner_html(&format!(
            r#"<input type="checkbox" value="{}"> {}"#,
            escape_html(&ingredient.value),
            escape_html(&ingredient.label)
        ));
        if let Err(e) = list.append_child(&label) {
            logging::error(&format!("插入食材选项失败: {:?}", e));
            return;
        }

        let checkbox = label
            .query_selector("input")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        let (Some(checkbox), Some(on_toggle)) = (checkbox, self.on_toggle.clone()) else {
            return;
        };

        let target = checkbox.clone();
        match dom::listen(&checkbox, "change", move |_| on_toggle(target.value(), target.checked())) {
            Ok(listener) => self.custom_listeners.push(listener),
            Err(e) => logging::error(&format!("绑定食材选项失败: {:?}", e)),
        }
    }

    fn clear_ingredient_input(&mut self) {
        if let Some(input) = &self.input {
            input.set_value("");
        }
    }
}

type SharedController = Rc<RefCell<RecipeController<DomRecipeSurface, StdRng>>>;

/// 菜谱页 - 挂载到现有页面结构上
///
/// 由页面脚本获取 `data_url()` 指向的数据，成功时调用 `load`，失败时调用 `fail_load`。
#[wasm_bindgen]
pub struct RecipeView {
    controller: SharedController,
    config: ViewConfig,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl RecipeView {
    /// `config_json` 可覆盖默认配置中的部分字段
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<RecipeView, JsValue> {
        let mut config = ViewConfig::recipes();
        if let Some(json) = config_json {
            config = config
                .with_overrides(&json)
                .map_err(|e| JsValue::from_str(&format!("解析视图配置失败: {}", e)))?;
        }

        let document = dom::document()?;
        let checkboxes = dom::checkboxes(&document, &config.checkbox_selector)?;
        let mut selection = IngredientSelection::with_options(checkboxes.iter().map(|c| c.value()));
        for checkbox in checkboxes.iter().filter(|c| c.checked()) {
            selection.toggle(&checkbox.value(), true);
        }

        let custom_list = match &config.custom_list_selector {
            Some(selector) => document.query_selector(selector)?,
            None => None,
        };
        let input = document
            .get_element_by_id(&config.text_input_id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());

        let detail = DomDetail::new(&document, &config)?;
        let overlay = detail.overlay().clone();
        let surface = DomRecipeSurface {
            document: document.clone(),
            grid: DomGrid::new(&document, &config)?,
            detail,
            custom_list,
            custom_class: config.custom_item_class.clone(),
            input,
            on_toggle: None,
            custom_listeners: Vec::new(),
        };

        let sort = RecipeSort::from_value(&dom::control_value(&document, &config.sort_id));
        let controller = Rc::new(RefCell::new(RecipeController::new(
            config.clone(),
            surface,
            selection,
            sort,
            StdRng::from_entropy(),
        )));

        {
            let mut guard = controller.borrow_mut();
            let surface = guard.surface_mut();

            let weak = Rc::downgrade(&controller);
            surface.grid.set_open_handler(Rc::new(move |id: u32| {
                with_controller(&weak, |c| {
                    c.open_detail(id);
                });
            }));

            let weak = Rc::downgrade(&controller);
            surface.on_toggle = Some(Rc::new(move |value: String, checked: bool| {
                with_controller(&weak, |c| c.toggle_ingredient(&value, checked));
            }));
        }

        let mut listeners = bind_inputs(&document, &config, &controller, &checkboxes)?;

        let weak = Rc::downgrade(&controller);
        listeners.extend(dom::bind_overlay_close(
            &document,
            &config,
            &overlay,
            Rc::new(move || with_controller(&weak, |c| c.close_detail())),
        )?);

        Ok(RecipeView {
            controller,
            config,
            _listeners: listeners,
        })
    }

    /// 数据文件地址
    pub fn data_url(&self) -> String {
        self.config.data_url.clone()
    }

    /// 传入数据文件内容（JSON 或压缩快照），返回菜谱数量
    pub fn load(&self, data: &[u8]) -> Result<usize, JsValue> {
        self.controller
            .borrow_mut()
            .load(data)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn fail_load(&self, reason: &str) {
        self.controller.borrow_mut().fail_load(reason);
    }

    pub fn open(&self, id: u32) -> bool {
        self.controller.borrow_mut().open_detail(id)
    }

    pub fn close(&self) {
        self.controller.borrow_mut().close_detail();
    }

    /// 当前显示的菜谱ID，按显示顺序
    pub fn visible_ids(&self) -> Vec<u32> {
        self.controller
            .borrow()
            .visible()
            .iter()
            .map(|recipe| recipe.id)
            .collect()
    }

    /// 当前勾选的食材
    pub fn selected_ingredients(&self) -> Result<JsValue, JsValue> {
        let controller = self.controller.borrow();
        serde_wasm_bindgen::to_value(controller.selection().selected())
            .map_err(|e| JsValue::from_str(&format!("序列化食材失败: {}", e)))
    }
}

// 查找按钮、排序下拉框、食材复选框、自定义食材输入
fn bind_inputs(
    document: &Document,
    config: &ViewConfig,
    controller: &SharedController,
    checkboxes: &[HtmlInputElement],
) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::new();

    if let Some(id) = &config.apply_button_id {
        let button = dom::element_by_id(document, id)?;
        let weak = Rc::downgrade(controller);
        listeners.push(dom::listen(&button, "click", move |_| {
            with_controller(&weak, |c| c.refresh());
        })?);
    }

    let select = dom::element_by_id(document, &config.sort_id)?;
    {
        let weak = Rc::downgrade(controller);
        let document = document.clone();
        let sort_id = config.sort_id.clone();
        listeners.push(dom::listen(&select, "change", move |_| {
            let value = dom::control_value(&document, &sort_id);
            with_controller(&weak, |c| c.set_sort(&value));
        })?);
    }

    for checkbox in checkboxes {
        let weak = Rc::downgrade(controller);
        let target = checkbox.clone();
        listeners.push(dom::listen(checkbox, "change", move |_| {
            let value = target.value();
            let checked = target.checked();
            with_controller(&weak, |c| c.toggle_ingredient(&value, checked));
        })?);
    }

    let add = {
        let weak = Rc::downgrade(controller);
        let document = document.clone();
        let input_id = config.text_input_id.clone();
        Rc::new(move || {
            let text = dom::control_value(&document, &input_id);
            with_controller(&weak, |c| {
                c.add_custom_ingredient(&text);
            });
        })
    };

    let button = dom::element_by_id(document, &config.text_button_id)?;
    let on_click = add.clone();
    listeners.push(dom::listen(&button, "click", move |_| on_click())?);

    let input = dom::element_by_id(document, &config.text_input_id)?;
    listeners.push(dom::listen(&input, "keypress", move |event: Event| {
        let is_enter = event
            .dyn_ref::<KeyboardEvent>()
            .map_or(false, |key| key.key() == "Enter");
        if is_enter {
            add();
        }
    })?);

    Ok(listeners)
}

fn with_controller(
    weak: &Weak<RefCell<RecipeController<DomRecipeSurface, StdRng>>>,
    action: impl FnOnce(&mut RecipeController<DomRecipeSurface, StdRng>),
) {
    let Some(controller) = weak.upgrade() else {
        return;
    };
    match controller.try_borrow_mut() {
        Ok(mut controller) => action(&mut controller),
        Err(_) => logging::warn("菜谱页正在处理其它事件，忽略本次输入"),
    };
}
