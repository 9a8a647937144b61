use ratatui::layout::{Margin, Rect};

/// Fixed-size box in the middle of `r`, clamped to `r`
pub fn centered(width: u16, height: u16, r: Rect) -> Rect {
    let horizontal = r.width.saturating_sub(width) / 2;
    let vertical = r.height.saturating_sub(height) / 2;
    r.inner(&Margin {
        horizontal,
        vertical,
    })
}

/// Strip of `height` rows at the bottom of `r`
pub fn bottom(height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    Rect {
        y: r.bottom() - height,
        height,
        ..r
    }
}
