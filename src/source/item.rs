// SPDX-License-Identifier: MPL-2.0
//! Renderable items handed out by [`ImageSource::create_graphics_item`].
//!
//! An item belongs to the caller once returned. Vector and static items are
//! self-contained; an animated item shares the source's animation so it always
//! shows the frame the engine is on.
//!
//! [`ImageSource::create_graphics_item`]: super::ImageSource::create_graphics_item

use super::RepresentationKind;
use crate::error::CannotHandle;
use crate::media::{Animation, Bitmap, ImageSize, VectorDocument};
use iced::widget::image::{self, FilterMethod};
use iced::widget::svg;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Animation shared between its source and the items displaying it.
pub type SharedAnimation = Rc<RefCell<Animation>>;

/// Identity of a renderable item. Two items never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(u64);

impl ItemId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug)]
pub enum GraphicsItem {
    Vector(VectorItem),
    Animated(AnimatedItem),
    Static(StaticItem),
}

impl GraphicsItem {
    #[must_use]
    pub fn id(&self) -> ItemId {
        match self {
            GraphicsItem::Vector(item) => item.id,
            GraphicsItem::Animated(item) => item.id,
            GraphicsItem::Static(item) => item.id,
        }
    }

    #[must_use]
    pub fn size(&self) -> ImageSize {
        match self {
            GraphicsItem::Vector(item) => item.size,
            GraphicsItem::Animated(item) => item.size(),
            GraphicsItem::Static(item) => item.size,
        }
    }

    #[must_use]
    pub fn kind(&self) -> RepresentationKind {
        match self {
            GraphicsItem::Vector(_) => RepresentationKind::Vector,
            GraphicsItem::Animated(_) => RepresentationKind::Animated,
            GraphicsItem::Static(_) => RepresentationKind::Static,
        }
    }
}

/// A vector document ready for the `svg` widget.
#[derive(Debug, Clone)]
pub struct VectorItem {
    id: ItemId,
    handle: svg::Handle,
    size: ImageSize,
}

impl VectorItem {
    pub(crate) fn from_document(document: &VectorDocument) -> Self {
        Self {
            id: ItemId::next(),
            handle: svg::Handle::from_memory(document.data().to_vec()),
            size: document.bounds().to_image_size(),
        }
    }

    /// Parses the file again and builds an item from it.
    pub(crate) fn load(path: &Path) -> Result<Self, CannotHandle> {
        VectorDocument::load(path).map(|document| Self::from_document(&document))
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn handle(&self) -> &svg::Handle {
        &self.handle
    }

    #[must_use]
    pub fn size(&self) -> ImageSize {
        self.size
    }
}

/// Displays whatever frame the shared animation is on.
#[derive(Debug)]
pub struct AnimatedItem {
    id: ItemId,
    animation: SharedAnimation,
    painted_generation: Option<u64>,
}

impl AnimatedItem {
    pub(crate) fn new(animation: SharedAnimation) -> Self {
        Self {
            id: ItemId::next(),
            animation,
            painted_generation: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Handle of the current frame.
    #[must_use]
    pub fn frame(&self) -> image::Handle {
        self.animation.borrow().current_frame().handle().clone()
    }

    #[must_use]
    pub fn size(&self) -> ImageSize {
        self.animation.borrow().size()
    }

    /// Returns `true` once per frame change: the engine moved to another frame
    /// since the last call, so the item has to be repainted.
    pub fn take_update(&mut self) -> bool {
        let generation = self.animation.borrow().generation();
        if self.painted_generation == Some(generation) {
            return false;
        }
        self.painted_generation = Some(generation);
        true
    }

    /// Smooth filtering when shrinking, nearest-neighbour at 100 % and above so
    /// pixel art stays crisp.
    #[must_use]
    pub fn filter_method(scale: f32) -> FilterMethod {
        if scale < 1.0 {
            FilterMethod::Linear
        } else {
            FilterMethod::Nearest
        }
    }
}

/// A private copy of a decoded still image.
#[derive(Debug, Clone)]
pub struct StaticItem {
    id: ItemId,
    handle: image::Handle,
    size: ImageSize,
}

impl StaticItem {
    pub(crate) fn from_bitmap(bitmap: &Bitmap) -> Self {
        let size = bitmap.size();
        Self {
            id: ItemId::next(),
            handle: image::Handle::from_rgba(size.width, size.height, bitmap.to_rgba_vec()),
            size,
        }
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn handle(&self) -> &image::Handle {
        &self.handle
    }

    #[must_use]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Still images are always drawn with smooth transformation.
    #[must_use]
    pub fn filter_method(&self) -> FilterMethod {
        FilterMethod::Linear
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{Delay, Frame, Rgba, RgbaImage};
    use std::time::Duration;

    fn shared_animation() -> SharedAnimation {
        let frames = (0..2)
            .map(|_| {
                Frame::from_parts(
                    RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255])),
                    0,
                    0,
                    Delay::from_numer_denom_ms(100, 1),
                )
            })
            .collect();
        Rc::new(RefCell::new(
            Animation::from_frames(frames).expect("valid frames"),
        ))
    }

    #[test]
    fn item_ids_are_unique() {
        let bitmap = Bitmap::from_rgba(1, 1, vec![0; 4]).expect("valid bitmap");
        let first = StaticItem::from_bitmap(&bitmap);
        let second = StaticItem::from_bitmap(&bitmap);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn static_item_keeps_bitmap_size_and_smooth_filter() {
        let bitmap = Bitmap::from_rgba(2, 3, vec![0; 24]).expect("valid bitmap");
        let item = StaticItem::from_bitmap(&bitmap);
        assert_eq!(item.size(), ImageSize::new(2, 3));
        assert_eq!(item.filter_method(), FilterMethod::Linear);
    }

    #[test]
    fn animated_filter_is_smooth_only_when_shrinking() {
        assert_eq!(AnimatedItem::filter_method(0.5), FilterMethod::Linear);
        assert_eq!(AnimatedItem::filter_method(1.0), FilterMethod::Nearest);
        assert_eq!(AnimatedItem::filter_method(3.0), FilterMethod::Nearest);
    }

    #[test]
    fn animated_item_reports_each_frame_change_once() {
        let animation = shared_animation();
        animation.borrow_mut().start();
        let mut item = AnimatedItem::new(Rc::clone(&animation));

        assert!(item.take_update());
        assert!(!item.take_update());

        animation.borrow_mut().advance(Duration::from_millis(100));
        assert!(item.take_update());
        assert!(!item.take_update());
        assert_eq!(item.size(), ImageSize::new(3, 2));
    }

    #[test]
    fn graphics_item_exposes_kind_and_size() {
        let item = GraphicsItem::Animated(AnimatedItem::new(shared_animation()));
        assert_eq!(item.kind(), RepresentationKind::Animated);
        assert_eq!(item.size(), ImageSize::new(3, 2));
    }
}
