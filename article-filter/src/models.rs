use serde::{Deserialize, Serialize};

/// "全部分类"复选框的值
pub const ALL_CATEGORIES: &str = "all";

/// 分类选择 - 两个状态："全部"与"部分分类"
///
/// "全部"与任何具体分类互斥，选择集合不会为空：取消最后一个分类时回到"全部"。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    All,
    /// 已勾选的分类，按勾选顺序，非空
    Some(Vec<String>),
}

impl CategorySelection {
    /// 由一组复选框值构建；包含 "all" 或为空都视为"全部"
    pub fn from_values<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if value == ALL_CATEGORIES {
                return CategorySelection::All;
            }
            if !selected.contains(&value) {
                selected.push(value);
            }
        }

        if selected.is_empty() {
            CategorySelection::All
        } else {
            CategorySelection::Some(selected)
        }
    }

    /// 复选框勾选状态变化
    pub fn toggle(&mut self, value: &str, checked: bool) {
        if value == ALL_CATEGORIES {
            // 取消"全部"会让集合变空，因此只有勾选时才需要处理
            if checked {
                *self = CategorySelection::All;
            }
            return;
        }

        match self {
            CategorySelection::All if checked => {
                *self = CategorySelection::Some(vec![value.to_string()]);
            }
            CategorySelection::All => {}
            CategorySelection::Some(selected) => {
                if checked {
                    if !selected.iter().any(|c| c == value) {
                        selected.push(value.to_string());
                    }
                } else {
                    selected.retain(|c| c != value);
                    if selected.is_empty() {
                        *self = CategorySelection::All;
                    }
                }
            }
        }
    }

    /// 某个复选框当前是否应处于勾选状态
    pub fn is_checked(&self, value: &str) -> bool {
        match self {
            CategorySelection::All => value == ALL_CATEGORIES,
            CategorySelection::Some(selected) => selected.iter().any(|c| c == value),
        }
    }

    /// 文章分类是否通过筛选
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Some(selected) => selected.iter().any(|c| c == category),
        }
    }
}

/// 排序方式，对应排序下拉框的值
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleSort {
    /// "newest" - 发布日期降序
    Newest,
    /// "oldest" - 发布日期升序
    Oldest,
    /// "readTime" - 阅读时长降序
    ReadTime,
}

impl ArticleSort {
    /// 其它值表示不排序
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "newest" => Some(ArticleSort::Newest),
            "oldest" => Some(ArticleSort::Oldest),
            "readTime" => Some(ArticleSort::ReadTime),
            _ => None,
        }
    }
}

/// 筛选条件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleQuery {
    /// 已去除首尾空白并转为小写的搜索词
    text: String,
    pub categories: CategorySelection,
}

impl ArticleQuery {
    pub fn new(text: &str, categories: CategorySelection) -> Self {
        let mut query = Self {
            text: String::new(),
            categories,
        };
        query.set_text(text);
        query
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.trim().to_lowercase();
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checking_all_clears_other_categories() {
        let mut selection = CategorySelection::from_values(["tech", "travel"]);
        selection.toggle(ALL_CATEGORIES, true);
        assert_eq!(selection, CategorySelection::All);
        assert!(!selection.is_checked("tech"));
    }

    #[test]
    fn checking_a_category_clears_all() {
        let mut selection = CategorySelection::All;
        selection.toggle("tech", true);
        assert!(!selection.is_checked(ALL_CATEGORIES));
        assert!(selection.is_checked("tech"));
    }

    #[test]
    fn unchecking_the_last_category_reverts_to_all() {
        let mut selection = CategorySelection::All;
        selection.toggle("tech", true);
        selection.toggle("travel", true);
        selection.toggle("tech", false);
        assert_eq!(selection, CategorySelection::Some(vec!["travel".to_string()]));
        selection.toggle("travel", false);
        assert_eq!(selection, CategorySelection::All);
    }

    #[test]
    fn unchecking_all_keeps_all() {
        let mut selection = CategorySelection::All;
        selection.toggle(ALL_CATEGORIES, false);
        assert_eq!(selection, CategorySelection::All);
    }

    #[test]
    fn all_and_empty_values_are_equivalent() {
        assert_eq!(CategorySelection::from_values(Vec::<String>::new()), CategorySelection::All);
        assert_eq!(CategorySelection::from_values(["tech", "all"]), CategorySelection::All);
    }

    #[test]
    fn sort_values() {
        assert_eq!(ArticleSort::from_value("readTime"), Some(ArticleSort::ReadTime));
        assert_eq!(ArticleSort::from_value("oldest"), Some(ArticleSort::Oldest));
        assert_eq!(ArticleSort::from_value("popular"), None);
    }

    #[test]
    fn query_text_is_normalised() {
        let query = ArticleQuery::new("  Rust Tips ", CategorySelection::All);
        assert_eq!(query.text(), "rust tips");
    }
}
