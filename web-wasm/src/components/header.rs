//! ヘッダーコンポーネント

use leptos::prelude::*;
use meme_gen_common::ServerStatus;

#[component]
pub fn Header(status: Signal<ServerStatus>) -> impl IntoView {
    view! {
        <header class="header">
            <div class="header-title">
                <h1>"AIミームジェネレーター"</h1>
                <p class="text-muted">"写真をAIで変身させよう"</p>
            </div>
            <Show when=move || status.get() != ServerStatus::Unknown>
                <span class=move || format!("server-badge {}", status.get().as_str())>
                    {move || if status.get().is_online() { "Online" } else { "Offline" }}
                </span>
            </Show>
        </header>
    }
}
