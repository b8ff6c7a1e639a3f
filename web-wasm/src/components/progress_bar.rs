//! 生成中インジケーター
//!
//! 進捗は取得できないので、アニメーションするバーだけを表示する。

use leptos::prelude::*;

#[component]
pub fn ProgressBar() -> impl IntoView {
    view! {
        <div class="progress-container">
            <div class="spinner" />
            <h3>"ミームを生成しています..."</h3>
            <p class="text-muted">"30〜60秒ほどかかります"</p>
            <div class="progress-bar">
                <div class="progress-fill indeterminate" />
            </div>
        </div>
    }
}
