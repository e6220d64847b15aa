use crate::coords::Rect;

use super::{DrawCmd, SortKey, ZIndex};

/// A recorded command with its paint-order key and clip.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
    /// Scissor rect in logical pixels; `None` draws everywhere.
    pub clip_rect: Option<Rect>,
}

/// Draw stream for one frame.
///
/// `push` is O(1). Paint-order iteration reuses an index buffer, so a warm
/// list does not allocate per frame.
///
/// Clips nest: `push_clip` intersects with the current clip, and every item
/// pushed before the matching `pop_clip` inherits it. The flip cards use
/// this to show one half of a digit at a time.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,

    clip_stack: Vec<Rect>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded items and clips, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_indices.clear();
        self.sorted_dirty = true;
        self.clip_stack.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(z, order),
            cmd,
            clip_rect: self.clip_stack.last().copied(),
        });
        self.sorted_dirty = true;
    }

    /// Starts a clipped region; balance with [`DrawList::pop_clip`].
    ///
    /// A clip that misses its parent becomes zero-sized, and renderers skip
    /// items with an empty clip.
    #[inline]
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect.normalized(),
            Some(&parent) => parent.intersect(rect).unwrap_or_default(),
        };
        self.clip_stack.push(effective);
    }

    #[inline]
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip without push_clip");
        self.clip_stack.pop();
    }

    /// Runs `f` inside a clip region.
    pub fn with_clip<R>(&mut self, rect: Rect, f: impl FnOnce(&mut DrawList) -> R) -> R {
        self.push_clip(rect);
        let out = f(self);
        self.pop_clip();
        out
    }

    /// Iterates items back-to-front without cloning them.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        let items = &self.items;
        self.sorted_indices.sort_by(|&a, &b| items[a].key.cmp(&items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    fn dot(list: &mut DrawList, z: i32, x: f32) {
        list.push_circle(ZIndex(z), Vec2::new(x, 0.0), 1.0, Color::WHITE, None);
    }

    fn xs(list: &mut DrawList) -> Vec<f32> {
        list.iter_in_paint_order()
            .map(|item| match &item.cmd {
                DrawCmd::Circle(c) => c.center.x,
                other => panic!("unexpected {}", other.kind_name()),
            })
            .collect()
    }

    #[test]
    fn paint_order_is_z_then_insertion() {
        let mut list = DrawList::new();
        dot(&mut list, 2, 0.0);
        dot(&mut list, 1, 1.0);
        dot(&mut list, 2, 2.0);
        dot(&mut list, 0, 3.0);
        assert_eq!(xs(&mut list), vec![3.0, 1.0, 0.0, 2.0]);
    }

    #[test]
    fn nested_clips_intersect_and_pop() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        list.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        dot(&mut list, 0, 0.0);
        list.pop_clip();
        dot(&mut list, 0, 1.0);
        list.pop_clip();
        dot(&mut list, 0, 2.0);

        let clips: Vec<_> = list.items().iter().map(|i| i.clip_rect).collect();
        assert_eq!(
            clips,
            vec![
                Some(Rect::new(50.0, 50.0, 50.0, 50.0)),
                Some(Rect::new(0.0, 0.0, 100.0, 100.0)),
                None,
            ]
        );
    }

    #[test]
    fn disjoint_clip_becomes_empty() {
        let mut list = DrawList::new();
        list.with_clip(Rect::new(0.0, 0.0, 10.0, 10.0), |l| {
            l.with_clip(Rect::new(20.0, 20.0, 5.0, 5.0), |l| dot(l, 0, 0.0));
        });
        let clip = list.items()[0].clip_rect.unwrap_or(Rect::new(1.0, 1.0, 1.0, 1.0));
        assert!(clip.is_empty());
    }

    #[test]
    fn clear_resets_order_and_clips() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 1.0, 1.0));
        dot(&mut list, 5, 0.0);
        list.clear();
        assert!(list.is_empty());
        dot(&mut list, 0, 1.0);
        assert_eq!(list.items()[0].key.order, 0);
        assert_eq!(list.items()[0].clip_rect, None);
    }
}
