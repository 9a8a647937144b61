//! Index stepping for lists that wrap, optionally through a "nothing selected" slot.

/// Next index, wrapping to the start
pub fn next(idx: Option<usize>, all: usize) -> Option<usize> {
    match idx {
        Some(idx) if idx + 1 < all => Some(idx + 1),
        _ => (all > 0).then_some(0),
    }
}

/// Previous index, where stepping back from the first item clears the selection
pub fn prev_opt(idx: Option<usize>, all: usize) -> Option<usize> {
    match idx {
        Some(0) => None,
        Some(idx) => Some(idx.min(all).saturating_sub(1)).filter(|_| all > 0),
        None => all.checked_sub(1),
    }
}

/// Next index, where stepping past the last item clears the selection
pub fn next_opt(idx: Option<usize>, all: usize) -> Option<usize> {
    match idx {
        Some(idx) => Some(idx + 1).filter(|next| *next < all),
        None => (all > 0).then_some(0),
    }
}
