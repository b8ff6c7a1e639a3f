//! メインアプリケーションコンポーネント

use gloo::timers::callback::Interval;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use meme_gen_common::{
    Finish, GalleryState, GenerationBackend, ServerStatus, Session, HEALTH_POLL_INTERVAL,
};
use crate::api::{endpoint, BrowserFile, FetchBackend};
use crate::components::{
    header::Header,
    image_gallery::ImageGallery,
    progress_bar::ProgressBar,
    status_banner::{ErrorBanner, OfflineBanner},
    text_input::TextInput,
    upload_area::{SelectedView, UploadArea},
};
use crate::handles::ObjectUrlStore;

/// 画面全体の状態（結果はObject URLで保持）
pub type WebSession = Session<BrowserFile, String>;

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // web_sys::File を含むのでスレッドローカルに置く
    let session = RwSignal::new_local(WebSession::new());
    let store = StoredValue::new_local(ObjectUrlStore::default());
    let backend = StoredValue::new(FetchBackend::new(endpoint()));
    let gallery = RwSignal::new(GalleryState::default());

    // ヘルスチェック（起動時に1回、以降30秒ごと）
    let check_health = move || {
        spawn_local(async move {
            let healthy = backend.get_value().check_health().await;
            let changed = session.try_update(|s| s.record_health(healthy)).unwrap_or(false);
            if changed {
                log::info!("server is {}", ServerStatus::from_check(healthy).as_str());
            }
        });
    };
    check_health();
    let poller = StoredValue::new_local(Some(Interval::new(
        HEALTH_POLL_INTERVAL.as_millis() as u32,
        check_health,
    )));

    on_cleanup(move || {
        if let Some(Some(interval)) = poller.try_update_value(Option::take) {
            interval.cancel();
        }
        session.try_update(|s| store.try_update_value(|st| s.teardown(st)));
    });

    let on_image_select = move |image| {
        session.update(|s| s.select_image(Some(image)));
    };

    let on_remove = move || {
        session.update(|s| s.select_image(None));
    };

    let on_text_change = move |text: String| {
        session.update(|s| s.set_description(&text));
    };

    let on_generate = move || {
        let Some(Ok(ticket)) = session.try_update(|s| s.begin_generate()) else {
            return;
        };
        log::debug!("sending generation request {}", ticket.id);

        spawn_local(async move {
            let outcome = backend
                .get_value()
                .generate(&ticket.file, &ticket.description)
                .await;
            let now_ms = js_sys::Date::now() as u64;

            let finish = session
                .try_update(|s| {
                    store.try_update_value(|st| s.finish_generate(ticket.id, outcome, st, now_ms))
                })
                .flatten();

            if let Some(Finish::Succeeded { .. }) = finish {
                gallery.update(|g| g.reset());
            }
        });
    };

    let on_clear = move || {
        let cleared = session.try_update(|s| store.try_update_value(|st| s.clear_results(st)));
        if let Some(Some(Ok(()))) = cleared {
            gallery.update(|g| g.reset());
        }
    };

    let on_dismiss = move || session.update(|s| s.dismiss_error());

    let status = Signal::derive(move || session.with(|s| s.server_status()));
    let is_generating = Signal::derive(move || session.with(|s| s.is_generating()));
    let selected = Signal::derive(move || {
        session.with(|s| s.selected().map(SelectedView::from_selected))
    });
    let description = Signal::derive(move || session.with(|s| s.description().to_string()));
    let can_generate = Signal::derive(move || session.with(|s| s.can_generate()));
    let error = Signal::derive(move || session.with(|s| s.error().map(str::to_string)));
    let results = Signal::derive(move || session.with(|s| s.results().to_vec()));
    let input_disabled = Signal::derive(move || {
        session.with(|s| s.selected().is_none() || !s.server_status().is_online())
    });

    view! {
        <div class="container">
            <Header status=status />

            <Show when=move || status.get() == ServerStatus::Offline>
                <OfflineBanner />
            </Show>
            <ErrorBanner message=error on_dismiss=on_dismiss />

            <section class="intro">
                <h2>"数秒でユニークなミームを作成"</h2>
                <p class="text-muted">
                    "画像をアップロードして変更内容を書くと、AIが4種類のバリエーションを生成します。"
                </p>
            </section>

            <div class="workspace">
                <div class="step">
                    <h3>"1. 画像をアップロード"</h3>
                    <UploadArea
                        selected=selected
                        on_image_select=on_image_select
                        on_remove=on_remove
                    />
                </div>
                <div class="step">
                    <h3>"2. 変更内容を入力"</h3>
                    <TextInput
                        text=description
                        is_generating=is_generating
                        disabled=input_disabled
                        can_generate=can_generate
                        on_text_change=on_text_change
                        on_generate=on_generate
                    />
                </div>
            </div>

            <Show when=move || is_generating.get()>
                <ProgressBar />
            </Show>

            <Show when=move || !is_generating.get() && !results.with(Vec::is_empty)>
                <ImageGallery images=results gallery=gallery on_clear=on_clear />
            </Show>
        </div>
    }
}
