use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shown wherever a value is unknown
pub const EMPTY_PLACEHOLDER: &str = "--";

pub fn align_right(text: &str, width: usize) -> String {
    let extra: usize = text
        .chars()
        .filter_map(|c| c.width_cjk().and_then(|w| w.checked_sub(1)))
        .sum();
    format!(
        "{text:>width$}",
        width = width.checked_sub(extra).unwrap_or(width)
    )
}

/// Cut `text` to at most `width` columns, ending with `…` when shortened
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let budget = width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if width > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_right() {
        assert_eq!(align_right("AAPL", 3), "AAPL");
        assert_eq!(align_right("AAPL", 10), "      AAPL");
        assert_eq!(align_right("成交量", 10), "    成交量");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Apple beats", 20), "Apple beats");
        assert_eq!(truncate("Apple beats estimates", 8), "Apple b…");
        assert_eq!(truncate("苹果公司财报", 5), "苹果…");
        assert_eq!(truncate("anything", 0), "");
    }
}
