use bitflags::bitflags;

bitflags! {
    /// Parts of the screen that changed since the last frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyFlags: u32 {
        const NONE = 0;
        /// Title bar (view, language, palette)
        const HEADER = 0b0000_0001;
        /// Chart area, mode and range tabs
        const CHART = 0b0000_0010;
        /// Price, change and key metrics
        const INFO = 0b0000_0100;
        const NEWS = 0b0000_1000;
        const SENTIMENT = 0b0001_0000;
        /// Comparison panes and verdict
        const COMPARE = 0b0010_0000;
        const TOAST = 0b0100_0000;
        /// Key hints and announcements
        const FOOTER = 0b1000_0000;
        const POPUP_HELP = 0b0001_0000_0000;
        const POPUP_SEARCH = 0b0010_0000_0000;
        const LOG_PANEL = 0b0100_0000_0000;
        /// Ticker-not-found view
        const ERROR = 0b1000_0000_0000;
        const LOADING = 0b0001_0000_0000_0000;
        const ALL = 0xFFFF_FFFF;
    }
}

impl DirtyFlags {
    #[inline]
    pub fn needs_render(self) -> bool {
        !self.is_empty()
    }

    /// Everything a new price series touches
    #[inline]
    #[must_use]
    pub fn mark_series_update(mut self) -> Self {
        self.insert(Self::CHART | Self::INFO | Self::COMPARE | Self::LOADING);
        self
    }

    #[inline]
    #[must_use]
    pub fn mark_sentiment_update(mut self) -> Self {
        self.insert(Self::SENTIMENT | Self::COMPARE | Self::LOADING);
        self
    }

    #[inline]
    #[must_use]
    pub fn mark_notice(mut self) -> Self {
        self.insert(Self::TOAST | Self::FOOTER);
        self
    }

    #[inline]
    #[must_use]
    pub fn mark_state_change(mut self) -> Self {
        self.insert(Self::ALL);
        self
    }
}

/// Tracks pending redraws for the render tick
#[derive(Debug)]
pub struct RenderState {
    dirty: DirtyFlags,
    render_count: u64,
    skip_count: u64,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    pub fn new() -> Self {
        Self {
            dirty: DirtyFlags::NONE,
            render_count: 0,
            skip_count: 0,
        }
    }

    #[inline]
    pub fn needs_render(&self) -> bool {
        self.dirty.needs_render()
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty.insert(flags);
    }

    #[inline]
    pub fn mark_all_dirty(&mut self) {
        self.dirty = DirtyFlags::ALL;
    }

    /// Called after a frame was drawn
    #[inline]
    pub fn clear(&mut self) {
        self.dirty = DirtyFlags::NONE;
        self.render_count += 1;
    }

    #[inline]
    pub fn skip(&mut self) {
        self.skip_count += 1;
    }

    #[inline]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Share of ticks that had nothing to draw, in percent
    #[allow(clippy::cast_precision_loss)]
    pub fn efficiency(&self) -> f64 {
        let total = self.render_count + self.skip_count;
        if total == 0 {
            0.0
        } else {
            (self.skip_count as f64 / total as f64) * 100.0
        }
    }

    pub fn stats(&self) -> String {
        format!(
            "renders: {}, skipped: {}, skip rate: {:.1}%",
            self.render_count,
            self.skip_count,
            self.efficiency()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{DirtyFlags, RenderState};

    #[test]
    fn flags() {
        assert!(!DirtyFlags::NONE.needs_render());

        let flags = DirtyFlags::NONE.mark_series_update();
        assert!(flags.contains(DirtyFlags::CHART | DirtyFlags::INFO));
        assert!(!flags.contains(DirtyFlags::NEWS));

        let flags = DirtyFlags::NONE.mark_notice();
        assert!(flags.contains(DirtyFlags::TOAST));
        assert!(!flags.contains(DirtyFlags::CHART));
    }

    #[test]
    fn render_cycle() {
        let mut state = RenderState::new();
        assert!(!state.needs_render());

        state.mark_dirty(DirtyFlags::NEWS);
        assert!(state.needs_render());
        assert_eq!(state.dirty(), DirtyFlags::NEWS);

        state.clear();
        assert!(!state.needs_render());
        assert_eq!(state.render_count, 1);

        for _ in 0..3 {
            state.skip();
        }
        assert!((state.efficiency() - 75.0).abs() < f64::EPSILON);
        assert_eq!(state.stats(), "renders: 1, skipped: 3, skip rate: 75.0%");
    }
}
