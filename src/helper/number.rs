/// Short volume: 1234567 → 1.23M (en, es) / 123.46万 (zh-CN)
pub fn format_volume(volume: u64) -> String {
    if volume == 0 {
        return crate::ui::text::EMPTY_PLACEHOLDER.to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let volume_f = volume as f64;

    if rust_i18n::locale().starts_with("zh") {
        if volume >= 100_000_000 {
            format!("{:.2}亿", volume_f / 100_000_000.0)
        } else if volume >= 10_000 {
            format!("{:.2}万", volume_f / 10_000.0)
        } else {
            volume.to_string()
        }
    } else if volume >= 1_000_000_000 {
        format!("{:.2}B", volume_f / 1_000_000_000.0)
    } else if volume >= 1_000_000 {
        format!("{:.2}M", volume_f / 1_000_000.0)
    } else if volume >= 1_000 {
        format!("{:.2}K", volume_f / 1_000.0)
    } else {
        volume.to_string()
    }
}
