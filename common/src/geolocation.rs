//! 位置情報取得の状態

/// `getCurrentPosition` のオプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u32,
    pub maximum_age_ms: u32,
}

/// 高精度・10秒タイムアウト・キャッシュ不使用
pub const POSITION_OPTIONS: PositionOptions = PositionOptions {
    enable_high_accuracy: true,
    timeout_ms: 10_000,
    maximum_age_ms: 0,
};

/// `GeolocationPositionError.code` の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl GeolocationErrorKind {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Unknown,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Vous avez refusé l'accès à votre position",
            Self::PositionUnavailable => "Votre position n'est pas disponible",
            Self::Timeout => "La demande de position a expiré",
            Self::Unknown => "Une erreur inconnue est survenue",
        }
    }
}

/// ボタンと状態表示の状態
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureStatus {
    Idle,
    Loading,
    Success { latitude: f64, longitude: f64 },
    Failed(GeolocationErrorKind),
    Unsupported,
}

impl CaptureStatus {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Loading => "Récupération de votre position...",
            Self::Success { .. } => "Position récupérée avec succès!",
            Self::Failed(kind) => kind.message(),
            Self::Unsupported => {
                "La géolocalisation n'est pas prise en charge par votre navigateur"
            }
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Loading => "loading",
            Self::Success { .. } => "success",
            Self::Failed(_) | Self::Unsupported => "error",
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "Position récupérée ✓",
            Self::Unsupported => "Géolocalisation non disponible",
            _ => "Récupérer ma position",
        }
    }

    pub fn button_disabled(&self) -> bool {
        matches!(self, Self::Unsupported)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_map_to_distinct_messages() {
        let kinds: Vec<_> = (1..=4).map(GeolocationErrorKind::from_code).collect();
        assert_eq!(
            kinds,
            vec![
                GeolocationErrorKind::PermissionDenied,
                GeolocationErrorKind::PositionUnavailable,
                GeolocationErrorKind::Timeout,
                GeolocationErrorKind::Unknown,
            ]
        );
        let mut messages: Vec<_> = kinds.iter().map(|k| k.message()).collect();
        messages.dedup();
        assert_eq!(messages.len(), 4);
        assert_eq!(GeolocationErrorKind::from_code(0), GeolocationErrorKind::Unknown);
    }

    #[test]
    fn test_status_rendering() {
        let ok = CaptureStatus::Success {
            latitude: 48.0,
            longitude: 2.0,
        };
        assert_eq!(ok.css_class(), "success");
        assert_eq!(ok.button_label(), "Position récupérée ✓");

        let failed = CaptureStatus::Failed(GeolocationErrorKind::Timeout);
        assert_eq!(failed.css_class(), "error");
        assert_eq!(failed.button_label(), "Récupérer ma position");
        assert!(!failed.button_disabled());
    }

    #[test]
    fn test_unsupported_disables_button() {
        let status = CaptureStatus::Unsupported;
        assert!(status.button_disabled());
        assert_eq!(status.button_label(), "Géolocalisation non disponible");
    }

    #[test]
    fn test_position_options() {
        assert!(POSITION_OPTIONS.enable_high_accuracy);
        assert_eq!(POSITION_OPTIONS.timeout_ms, 10_000);
        assert_eq!(POSITION_OPTIONS.maximum_age_ms, 0);
    }
}
