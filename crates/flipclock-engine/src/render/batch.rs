use std::ops::Range;

use crate::coords::Rect;

/// Pipeline a batch draws with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BatchKind {
    Quad,
    RoundedRect,
    Circle,
    Text,
}

/// A run of instances sharing a pipeline and a clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub kind: BatchKind,
    pub clip: Option<Rect>,
    /// Range into that kind's instance buffer.
    pub instances: Range<u32>,
}

/// Paint-ordered list of batches for one frame.
///
/// Instances are appended per kind in paint order, so a new run of the same
/// kind and clip always continues where the previous batch ended and can be
/// merged into it.
#[derive(Debug, Default)]
pub struct BatchPlan {
    batches: Vec<Batch>,
}

impl BatchPlan {
    pub fn clear(&mut self) {
        self.batches.clear();
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Records `instances` of `kind`; empty ranges are ignored.
    pub fn push(&mut self, kind: BatchKind, clip: Option<Rect>, instances: Range<u32>) {
        if instances.is_empty() {
            return;
        }
        if let Some(last) = self.batches.last_mut()
            && last.kind == kind
            && last.clip == clip
            && last.instances.end == instances.start
        {
            last.instances.end = instances.end;
            return;
        }
        self.batches.push(Batch {
            kind,
            clip,
            instances,
        });
    }
}
