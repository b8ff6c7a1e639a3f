//! エラー・オフライン表示

use leptos::prelude::*;

/// サーバーがオフラインの間ずっと出すバナー
#[component]
pub fn OfflineBanner() -> impl IntoView {
    view! {
        <div class="banner banner-error" role="alert">
            "サーバーが一時的に利用できません。しばらくしてから再度お試しください。"
        </div>
    }
}

/// 直近のエラー（閉じられる）
#[component]
pub fn ErrorBanner<F>(message: Signal<Option<String>>, on_dismiss: F) -> impl IntoView
where
    F: Fn() + Clone + Send + Sync + 'static,
{
    view! {
        {move || message.get().map(|text| {
            let on_dismiss = on_dismiss.clone();
            view! {
                <div class="banner banner-error" role="alert">
                    <span>{text}</span>
                    <button class="btn btn-small btn-tertiary" on:click=move |_| on_dismiss()>
                        "×"
                    </button>
                </div>
            }
        })}
    }
}
