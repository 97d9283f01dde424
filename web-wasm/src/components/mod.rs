//! ページごとのコントローラ

pub mod address_autocomplete;
pub mod contact_sharer;
pub mod geolocation_capture;
pub mod photo_gallery;
pub mod photo_uploader;
pub mod progress_bar;
pub mod registration_validator;
pub mod upload_area;
