//! Filter dialogs. While one is open the user can try parameters freely, each attempt
//! recomputed from the original, then either keep the last one or go back to what was showing
//! when the dialog opened.

use sketchbook_core::{bitmap::Bitmap, filter::Filter, state::Canvas};

#[derive(Debug)]
pub struct FilterPreview {
    /// Working bitmap at the time the dialog opened.
    snapshot: Option<Bitmap>,
    last: Option<Filter>,
}
impl FilterPreview {
    #[must_use]
    pub fn open(canvas: &Canvas) -> Self {
        Self {
            snapshot: canvas.working_bitmap_copy(),
            last: None,
        }
    }
    pub fn preview(&mut self, canvas: &mut Canvas, filter: Filter) {
        canvas.apply_filter(filter);
        self.last = Some(filter);
    }
    /// The most recently previewed filter.
    #[must_use]
    pub fn last(&self) -> Option<Filter> {
        self.last
    }
    /// Keep whatever is showing.
    pub fn accept(self) -> Option<Filter> {
        if let Some(filter) = self.last {
            log::debug!("Accepted {filter:?}");
        }
        self.last
    }
    /// Put back the working bitmap from when the dialog opened.
    pub fn cancel(self, canvas: &mut Canvas) {
        log::debug!("Cancelled preview");
        canvas.set_working_bitmap(self.snapshot);
    }
}
