//! アップロードエリアコンポーネント

use leptos::html;
use leptos::prelude::*;
use meme_gen_common::uploader::{format_size_mb, pick_first_image};
use meme_gen_common::{DropZone, FileMeta, SelectedImage};
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, File, FileList, FileReader, ProgressEvent};
use crate::api::BrowserFile;

/// 選択中の画像の表示用情報
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedView {
    pub preview: String,
    pub name: String,
    pub size_label: String,
}

impl SelectedView {
    pub fn from_selected(image: &SelectedImage<BrowserFile>) -> Self {
        Self {
            preview: image.preview.clone(),
            name: image.name.clone(),
            size_label: format_size_mb(image.file.0.size() as u64),
        }
    }
}

#[component]
pub fn UploadArea<FS, FR>(
    selected: Signal<Option<SelectedView>>,
    on_image_select: FS,
    on_remove: FR,
) -> impl IntoView
where
    FS: Fn(SelectedImage<BrowserFile>) + Clone + Send + Sync + 'static,
    FR: Fn() + Clone + Send + Sync + 'static,
{
    let zone = RwSignal::new(DropZone::default());
    let input_ref = NodeRef::<html::Input>::new();

    let on_drop = {
        let on_image_select = on_image_select.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            let files = ev
                .data_transfer()
                .and_then(|dt| dt.files())
                .map(|list| file_list_to_vec(&list))
                .unwrap_or_default();
            let metas: Vec<FileMeta> = files.iter().map(file_meta).collect();

            let picked = zone.try_update(|z| z.drop_files(metas.iter())).flatten();
            if let Some(file) = picked.and_then(|index| files.into_iter().nth(index)) {
                read_file(file, on_image_select.clone());
            }
        }
    };

    let on_change = {
        let on_image_select = on_image_select.clone();
        move |_| {
            let Some(input) = input_ref.get() else { return };
            let files = input.files().map(|list| file_list_to_vec(&list)).unwrap_or_default();
            let metas: Vec<FileMeta> = files.iter().map(file_meta).collect();
            if let Some(index) = pick_first_image(metas.iter()) {
                if let Some(file) = files.into_iter().nth(index) {
                    read_file(file, on_image_select.clone());
                }
            }
        }
    };

    let on_remove_click = move |_| {
        on_remove();
        // 同じファイルを選び直してもchangeが発火するように
        if let Some(input) = input_ref.get() {
            input.set_value("");
        }
    };

    view! {
        <div class="upload">
            {move || match selected.get() {
                None => view! {
                    <div
                        class="upload-area"
                        class:dragover=move || zone.get().is_drag_over()
                        on:dragover=move |ev: DragEvent| {
                            ev.prevent_default();
                            zone.update(|z| z.drag_enter());
                        }
                        on:dragleave=move |ev: DragEvent| {
                            ev.prevent_default();
                            zone.update(|z| z.drag_leave());
                        }
                        on:drop=on_drop.clone()
                        on:click=move |_| {
                            if let Some(input) = input_ref.get() {
                                input.click();
                            }
                        }
                    >
                        <div class="upload-icon">"📷"</div>
                        <h3>
                            {move || if zone.get().is_drag_over() { "ここにドロップ！" } else { "画像をアップロード" }}
                        </h3>
                        <p>"ドラッグ&ドロップ または クリックして選択"</p>
                        <p class="text-muted">"対応形式: JPG, PNG, WebP（最大5MB）"</p>
                    </div>
                }
                .into_any(),
                Some(image) => view! {
                    <div class="upload-preview">
                        <img src=image.preview.clone() alt=image.name.clone() />
                        <div class="upload-preview-info">
                            <div>
                                <p class="file-name">{image.name.clone()}</p>
                                <p class="text-muted">{image.size_label.clone()}</p>
                            </div>
                            <button class="btn btn-small btn-tertiary" on:click=on_remove_click.clone()>
                                "削除"
                            </button>
                        </div>
                    </div>
                }
                .into_any(),
            }}
            <input
                node_ref=input_ref
                type="file"
                accept="image/*"
                style="display: none"
                on:change=on_change
            />
        </div>
    }
}

fn file_list_to_vec(files: &FileList) -> Vec<File> {
    (0..files.length()).filter_map(|i| files.get(i)).collect()
}

fn file_meta(file: &File) -> FileMeta {
    FileMeta::new(&file.name(), &file.type_(), file.size() as u64)
}

/// Data URLとして読み込み、終わったら選択画像として通知する
fn read_file<F>(file: File, on_image_select: F)
where
    F: Fn(SelectedImage<BrowserFile>) + 'static,
{
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            log::warn!("FileReader unavailable: {:?}", e);
            return;
        }
    };

    let name = file.name();
    let reader_clone = reader.clone();
    let selected_file = file.clone();
    let on_load = Closure::once_into_js(move |_: ProgressEvent| {
        let preview = reader_clone.result().ok().and_then(|v| v.as_string());
        match preview {
            Some(data_url) => {
                on_image_select(SelectedImage::new(BrowserFile(selected_file), data_url, name));
            }
            None => log::warn!("failed to read {}", name),
        }
    });

    reader.set_onload(Some(on_load.unchecked_ref()));
    if let Err(e) = reader.read_as_data_url(&file) {
        log::warn!("failed to start reading file: {:?}", e);
    }
}
