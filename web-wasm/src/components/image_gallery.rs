//! 生成結果ギャラリーコンポーネント

use leptos::prelude::*;
use meme_gen_common::gallery::{bulk_download_delay_ms, download_file_name, is_listed};
use meme_gen_common::{GalleryState, GeneratedImage};
use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAnchorElement;

#[component]
pub fn ImageGallery<FC>(
    images: Signal<Vec<GeneratedImage<String>>>,
    gallery: RwSignal<GalleryState>,
    on_clear: FC,
) -> impl IntoView
where
    FC: Fn() + Clone + Send + Sync + 'static,
{
    let download_all = move |_| {
        for (index, image) in images.get_untracked().into_iter().enumerate() {
            Timeout::new(bulk_download_delay_ms(index), move || {
                // 待機中にクリア・再生成された画像は解放済み
                let listed = images
                    .try_with_untracked(|list| is_listed(list, index, &image.handle))
                    .unwrap_or(false);
                if listed {
                    download(gallery, index, &image.handle);
                } else {
                    log::debug!("skipping download of replaced image {}", index + 1);
                }
            })
            .forget();
        }
    };

    let preview_url = move || {
        let index = gallery.with(|g| g.preview())?;
        images.with(|list| list.get(index).map(|img| img.handle.clone()))
    };

    view! {
        <section class="gallery">
            <div class="gallery-header">
                <h3>"生成されたミーム"</h3>
                <button class="btn btn-small btn-tertiary" on:click=move |_| on_clear()>
                    "クリア"
                </button>
            </div>

            <div class="gallery-grid">
                <For
                    each=move || images.get().into_iter().enumerate()
                    key=|(_, image)| image.id.clone()
                    children=move |(index, image)| {
                        let is_downloading = move || gallery.with(|g| g.is_downloading(index));
                        let handle = image.handle.clone();
                        view! {
                            <div class="gallery-card">
                                <img
                                    src=image.handle.clone()
                                    alt=format!("ミーム {}", index + 1)
                                    on:click=move |_| gallery.update(|g| g.open_preview(index))
                                />
                                <div class="gallery-card-info">
                                    <span>{format!("バリエーション {}", index + 1)}</span>
                                    <button
                                        class="btn btn-small btn-secondary"
                                        disabled=is_downloading
                                        on:click=move |_| download(gallery, index, &handle)
                                    >
                                        {move || if is_downloading() { "保存中..." } else { "ダウンロード" }}
                                    </button>
                                </div>
                            </div>
                        }
                    }
                />
            </div>

            <button class="btn btn-primary btn-download-all" on:click=download_all>
                "すべてダウンロード"
            </button>

            {move || preview_url().map(|url| view! {
                <div class="modal-backdrop" on:click=move |_| gallery.update(|g| g.close_preview())>
                    <img
                        class="modal-image"
                        src=url
                        alt="プレビュー"
                        on:click=|ev| ev.stop_propagation()
                    />
                    <button
                        class="btn btn-small btn-secondary modal-close"
                        on:click=move |_| gallery.update(|g| g.close_preview())
                    >
                        "×"
                    </button>
                </div>
            })}
        </section>
    }
}

/// 1枚をダウンロード（同じ画像の保存中は無視）
fn download(gallery: RwSignal<GalleryState>, index: usize, url: &str) {
    if !gallery.try_update(|g| g.start_download(index)).unwrap_or(false) {
        return;
    }
    if let Err(e) = trigger_download(url, &download_file_name(index)) {
        log::warn!("download failed: {:?}", e);
    }
    gallery.try_update(|g| g.finish_download());
}

fn trigger_download(url: &str, file_name: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    link.set_href(url);
    link.set_download(file_name);
    link.set_attribute("style", "display: none")?;

    body.append_child(&link)?;
    link.click();
    link.remove();
    Ok(())
}
