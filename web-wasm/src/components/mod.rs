pub mod header;
pub mod image_gallery;
pub mod progress_bar;
pub mod status_banner;
pub mod text_input;
pub mod upload_area;
