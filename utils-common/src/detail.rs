use crate::catalog::Catalog;
use crate::logging;
use crate::models::Entity;
use crate::surface::DetailSurface;

/// 打开详情弹窗
///
/// 目录未就绪或ID不存在时不做任何事，返回 `false`。
pub fn open_detail<E: Entity, S: DetailSurface>(
    catalog: Option<&Catalog<E>>,
    id: u32,
    surface: &mut S,
) -> bool {
    let Some(catalog) = catalog else {
        return false;
    };

    let entity = match catalog.find_by_id(id) {
        Ok(entity) => entity,
        Err(e) => {
            logging::warn(&format!("忽略详情请求: {}", e));
            return false;
        }
    };

    for (slot, value) in entity.detail_fields() {
        surface.fill(slot, &value);
    }
    surface.set_overlay_visible(true);
    surface.set_scroll_locked(true);
    true
}

/// 关闭详情弹窗并恢复页面滚动
pub fn close_detail<S: DetailSurface>(surface: &mut S) {
    surface.set_overlay_visible(false);
    surface.set_scroll_locked(false);
}
