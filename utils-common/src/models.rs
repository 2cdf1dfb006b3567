use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::surface::DetailValue;

/// 目录条目 - 文章与菜谱共同的行为
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// 数据文件中存放条目列表的字段名
    const COLLECTION: &'static str;

    /// 条目唯一标识符
    fn id(&self) -> u32;

    /// 详情弹窗中各个字段的内容，按槽位名称给出
    fn detail_fields(&self) -> Vec<(&'static str, DetailValue)>;
}

/// 文章 - 对应 articles.json 中的一项
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    /// 文章唯一标识符
    pub id: u32,
    /// 文章标题
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    /// 文章摘要
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    /// 文章正文（富文本）
    #[serde(deserialize_with = "lenient::text")]
    pub content: String,
    /// 作者
    #[serde(deserialize_with = "lenient::text")]
    pub author: String,
    /// 分类
    #[serde(deserialize_with = "lenient::text")]
    pub category: String,
    /// 发布日期，例如 "2024-03-15"
    #[serde(deserialize_with = "lenient::text")]
    pub publish_date: String,
    /// 阅读时长，例如 "8 min read"
    #[serde(deserialize_with = "lenient::text")]
    pub read_time: String,
    /// 封面图片地址
    #[serde(deserialize_with = "lenient::text")]
    pub image: String,
}

impl Entity for Article {
    const COLLECTION: &'static str = "articles";

    fn id(&self) -> u32 {
        self.id
    }

    fn detail_fields(&self) -> Vec<(&'static str, DetailValue)> {
        vec![
            ("title", DetailValue::Text(self.title.clone())),
            ("image", DetailValue::Image {
                src: self.image.clone(),
                alt: self.title.clone(),
            }),
            ("author", DetailValue::Text(format!("By {}", self.author))),
            ("date", DetailValue::Text(self.publish_date.clone())),
            ("read_time", DetailValue::Text(self.read_time.clone())),
            ("category", DetailValue::Text(self.category.clone())),
            ("content", DetailValue::Html(self.content.clone())),
        ]
    }
}

/// 菜谱 - 对应 recipes.json 中的一项
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    pub id: u32,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    /// 菜系所属国家
    #[serde(deserialize_with = "lenient::text")]
    pub country: String,
    /// 烹饪时长，例如 "30 min"
    #[serde(deserialize_with = "lenient::text")]
    pub cook_time: String,
    #[serde(deserialize_with = "lenient::count")]
    pub servings: Option<u32>,
    #[serde(deserialize_with = "lenient::text")]
    pub image: String,
    /// 食材列表，按原始顺序
    #[serde(deserialize_with = "lenient::text_list")]
    pub ingredients: Vec<String>,
    /// 步骤列表，按原始顺序
    #[serde(deserialize_with = "lenient::text_list")]
    pub instructions: Vec<String>,
}

impl Entity for Recipe {
    const COLLECTION: &'static str = "recipes";

    fn id(&self) -> u32 {
        self.id
    }

    fn detail_fields(&self) -> Vec<(&'static str, DetailValue)> {
        let servings = self.servings.map(|s| s.to_string()).unwrap_or_default();

        vec![
            ("title", DetailValue::Text(self.name.clone())),
            ("image", DetailValue::Image {
                src: self.image.clone(),
                alt: self.name.clone(),
            }),
            ("country", DetailValue::Text(self.country.clone())),
            ("cook_time", DetailValue::Text(self.cook_time.clone())),
            ("servings", DetailValue::Text(servings)),
            ("ingredients", DetailValue::List(self.ingredients.clone())),
            ("instructions", DetailValue::List(self.instructions.clone())),
        ]
    }
}

/// 展示字段的宽松读取
///
/// JSON 中的 null、数字或布尔值只影响该字段的显示内容，不会让整个目录加载失败。
/// 快照不是自描述格式，按字段原类型读取。
mod lenient {
    use std::fmt;

    use serde::de::{Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
    use serde::Deserialize;

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        if !deserializer.is_human_readable() {
            return String::deserialize(deserializer);
        }
        deserializer.deserialize_any(TextVisitor)
    }

    pub fn text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        if !deserializer.is_human_readable() {
            return Vec::<String>::deserialize(deserializer);
        }
        deserializer.deserialize_any(ListVisitor)
    }

    /// 份数：整数或数字文本，其它内容视为缺失
    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        if !deserializer.is_human_readable() {
            return Option::<u32>::deserialize(deserializer);
        }
        Ok(text(deserializer)?.trim().parse().ok())
    }

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("文本、数字、布尔值或 null")
        }

        fn visit_str<E>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<String, D::Error> {
            text(deserializer)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<String, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(String::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<String, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(String::new())
        }
    }

    struct Item(String);

    impl<'de> Deserialize<'de> for Item {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            text(deserializer).map(Item)
        }
    }

    struct ListVisitor;

    impl<'de> Visitor<'de> for ListVisitor {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("文本列表或 null")
        }

        fn visit_str<E>(self, v: &str) -> Result<Vec<String>, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_string<E>(self, v: String) -> Result<Vec<String>, E> {
            Ok(vec![v])
        }

        fn visit_bool<E>(self, v: bool) -> Result<Vec<String>, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_i64<E>(self, v: i64) -> Result<Vec<String>, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_u64<E>(self, v: u64) -> Result<Vec<String>, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_f64<E>(self, v: f64) -> Result<Vec<String>, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_unit<E>(self) -> Result<Vec<String>, E> {
            Ok(Vec::new())
        }

        fn visit_none<E>(self) -> Result<Vec<String>, E> {
            Ok(Vec::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Vec<String>, D::Error> {
            text_list(deserializer)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<String>, A::Error> {
            let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(Item(item)) = seq.next_element()? {
                items.push(item);
            }
            Ok(items)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Vec<String>, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(Vec::new())
        }
    }
}
