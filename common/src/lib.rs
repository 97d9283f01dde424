//! Account UI Common Library
//!
//! ブラウザ(WASM)とCLIで共有される状態と検証ルール

pub mod address;
pub mod config;
pub mod contacts;
pub mod csrf;
pub mod error;
pub mod geocode;
pub mod geolocation;
pub mod password;
pub mod registration;
pub mod uploader;

pub use address::{AddressApi, AddressCandidate, CursorAction, Key, MapView, ResultCursor};
pub use config::EndpointConfig;
pub use contacts::{Contact, ContactList, PhoneCheckResponse};
pub use error::{Error, Result};
pub use geocode::{NominatimApi, NominatimHit};
pub use geolocation::{CaptureStatus, GeolocationErrorKind, POSITION_OPTIONS};
pub use password::{PasswordCheck, PasswordRule};
pub use registration::{CaptchaState, CompanyFields, FormState, FormStatus, PersonalFields, RegistrationForm};
pub use uploader::{PendingFiles, UploadOutcome, UploadProgress, UploadResponse};
