//! 説明文入力コンポーネント

use leptos::prelude::*;
use meme_gen_common::input::{char_counter, is_submit_shortcut, visible_suggestions, MAX_DESCRIPTION_CHARS};
use web_sys::{Event, KeyboardEvent};

#[component]
pub fn TextInput<FI, FG>(
    text: Signal<String>,
    is_generating: Signal<bool>,
    disabled: Signal<bool>,
    can_generate: Signal<bool>,
    on_text_change: FI,
    on_generate: FG,
) -> impl IntoView
where
    FI: Fn(String) + Clone + Send + Sync + 'static,
    FG: Fn() + Clone + Send + Sync + 'static,
{
    let on_input = {
        let on_text_change = on_text_change.clone();
        move |ev: Event| on_text_change(event_target_value(&ev))
    };

    let on_keydown = {
        let on_generate = on_generate.clone();
        move |ev: KeyboardEvent| {
            if is_submit_shortcut(&ev.key(), ev.ctrl_key() || ev.meta_key()) {
                ev.prevent_default();
                on_generate();
            }
        }
    };

    view! {
        <div class="text-input">
            <label for="description">"どのように変更しますか？"</label>
            <textarea
                id="description"
                rows="4"
                maxlength=MAX_DESCRIPTION_CHARS.to_string()
                placeholder="例: かっこいいサングラスをかける"
                prop:value=move || text.get()
                disabled=move || disabled.get() || is_generating.get()
                on:input=on_input
                on:keydown=on_keydown
            />
            <div class="text-input-footer">
                <span class="text-muted">"Ctrl+Enterで生成"</span>
                <span class="char-counter">{move || char_counter(&text.get())}</span>
            </div>

            <div class="suggestions">
                <p class="text-muted">"アイデア:"</p>
                {visible_suggestions()
                    .iter()
                    .map(|suggestion| {
                        let on_text_change = on_text_change.clone();
                        view! {
                            <button
                                class="btn btn-small btn-secondary"
                                disabled=move || disabled.get() || is_generating.get()
                                on:click=move |_| on_text_change(suggestion.to_string())
                            >
                                {*suggestion}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <button
                class="btn btn-primary btn-generate"
                disabled=move || !can_generate.get()
                on:click=move |_| on_generate()
            >
                {move || if is_generating.get() { "生成中..." } else { "ミームを生成" }}
            </button>
        </div>
    }
}
