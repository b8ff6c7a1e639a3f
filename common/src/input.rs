//! 説明文入力
//!
//! 文字数上限での切り詰め、候補の提示、Ctrl+Enter判定。

/// 説明文の最大文字数
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// 画面に表示する候補数
pub const VISIBLE_SUGGESTIONS: usize = 4;

/// 入力候補
pub const SUGGESTIONS: &[&str] = &[
    "大きくて面白いひげを付ける",
    "カートゥーン風にする",
    "かっこいいサングラスをかける",
    "スーパーヒーローっぽくする",
    "コック帽をかぶせる",
    "ゾンビにする",
    "壮大なあごひげを付ける",
    "海賊っぽくする",
];

/// 表示する候補
pub fn visible_suggestions() -> &'static [&'static str] {
    &SUGGESTIONS[..VISIBLE_SUGGESTIONS.min(SUGGESTIONS.len())]
}

/// 上限文字数で切り詰める（文字単位）
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// 文字数カウンター表示 ("12/200")
pub fn char_counter(text: &str) -> String {
    format!("{}/{}", text.chars().count(), MAX_DESCRIPTION_CHARS)
}

/// 生成ショートカット（Ctrl+Enter）か
pub fn is_submit_shortcut(key: &str, ctrl: bool) -> bool {
    ctrl && key == "Enter"
}
