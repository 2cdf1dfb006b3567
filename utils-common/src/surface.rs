use std::collections::HashMap;

/// 详情弹窗中一个槽位的内容
#[derive(Clone, Debug, PartialEq)]
pub enum DetailValue {
    /// 纯文本
    Text(String),
    /// 富文本，原样插入
    Html(String),
    /// 图片地址和替代文本
    Image { src: String, alt: String },
    /// 列表项
    List(Vec<String>),
}

/// 渲染好的卡片
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    /// 卡片对应的条目ID，由操作按钮携带
    pub id: u32,
    /// 卡片容器的 class
    pub class_name: &'static str,
    /// 卡片内部 HTML
    pub inner_html: String,
}

/// 卡片网格 - 渲染器唯一的写入目标
pub trait GridSurface {
    /// 清空网格
    fn clear(&mut self);
    /// 在网格位置显示一条固定提示（无结果或加载失败）
    fn show_message(&mut self, class_name: &str, message: &str);
    /// 追加一张卡片
    fn append_card(&mut self, card: &Card);
    /// 更新计数标签
    fn set_count(&mut self, count: usize);
    /// 重新绑定全部"查看详情"按钮，旧的绑定一并拆除
    fn bind_open_actions(&mut self, action_class: &str, ids: &[u32]);
}

/// 详情弹窗
pub trait DetailSurface {
    fn fill(&mut self, slot: &str, value: &DetailValue);
    fn set_overlay_visible(&mut self, visible: bool);
    /// 锁定/恢复页面背景滚动
    fn set_scroll_locked(&mut self, locked: bool);
}

/// 内存中的展示面，记录渲染结果，供无 DOM 环境（测试、预渲染）使用
#[derive(Debug, Default)]
pub struct MemorySurface {
    pub cards: Vec<Card>,
    pub message: Option<(String, String)>,
    pub count: Option<usize>,
    /// 网格上已绑定"打开详情"的卡片，清空网格时一并清除
    pub bound_actions: Vec<u32>,
    /// 绑定被整体重建的次数
    pub bind_generation: usize,
    pub detail: HashMap<String, DetailValue>,
    pub overlay_visible: bool,
    pub scroll_locked: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前网格中卡片的ID顺序
    pub fn card_ids(&self) -> Vec<u32> {
        self.cards.iter().map(|card| card.id).collect()
    }

    pub fn message_text(&self) -> Option<&str> {
        self.message.as_ref().map(|(_, text)| text.as_str())
    }
}

impl GridSurface for MemorySurface {
    fn clear(&mut self) {
        self.cards.clear();
        self.message = None;
        self.bound_actions.clear();
    }

    fn show_message(&mut self, class_name: &str, message: &str) {
        self.cards.clear();
        self.message = Some((class_name.to_string(), message.to_string()));
    }

    fn append_card(&mut self, card: &Card) {
        self.cards.push(card.clone());
    }

    fn set_count(&mut self, count: usize) {
        self.count = Some(count);
    }

    fn bind_open_actions(&mut self, _action_class: &str, ids: &[u32]) {
        self.bound_actions = ids.to_vec();
        self.bind_generation += 1;
    }
}

impl DetailSurface for MemorySurface {
    fn fill(&mut self, slot: &str, value: &DetailValue) {
        self.detail.insert(slot.to_string(), value.clone());
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        self.overlay_visible = visible;
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }
}
