//! 登録フォームの入力状態と送信ボタンの可否

use crate::address::geocode_query;
use crate::password::PasswordCheck;

/// 個人情報フィールド
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub password_confirm: String,
}

impl PersonalFields {
    pub fn all_filled(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone_number,
            &self.password,
            &self.password_confirm,
        ]
        .iter()
        .all(|value| is_filled(value))
    }

    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirm
    }
}

/// 会社情報フィールド（会社登録ページのみ）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFields {
    pub name: String,
    pub siret: String,
    pub category: String,
    /// 先頭の「Sélectionnez…」が選ばれている
    pub category_placeholder_selected: bool,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub latitude: String,
    pub longitude: String,
}

impl CompanyFields {
    pub fn category_value(&self) -> &str {
        if self.category_placeholder_selected {
            ""
        } else {
            &self.category
        }
    }

    /// 座標は任意なので判定に含めない
    pub fn all_filled(&self) -> bool {
        is_filled(&self.name)
            && is_filled(&self.siret)
            && is_filled(self.category_value())
            && self.address_filled()
    }

    pub fn address_filled(&self) -> bool {
        is_filled(&self.address) && is_filled(&self.postal_code) && is_filled(&self.city)
    }

    pub fn has_coordinates(&self) -> bool {
        is_filled(&self.latitude) && is_filled(&self.longitude)
    }

    /// 座標が空で住所が揃っている
    pub fn needs_geocode(&self) -> bool {
        !self.has_coordinates() && self.address_filled()
    }

    pub fn geocode_query(&self) -> Option<String> {
        geocode_query(&self.address, &self.postal_code, &self.city)
    }
}

fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// reCAPTCHA の状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptchaState {
    #[default]
    Pending,
    Completed,
    Expired,
    Errored,
}

impl CaptchaState {
    pub fn completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// コールバック直後に表示する文言
    pub fn event_message(&self) -> Option<&'static str> {
        match self {
            Self::Pending => None,
            Self::Completed => Some("reCAPTCHA validé ! Vérification des autres champs..."),
            Self::Expired => Some("Le reCAPTCHA a expiré. Veuillez le valider à nouveau."),
            Self::Errored => {
                Some("Une erreur s'est produite avec le reCAPTCHA. Veuillez réessayer.")
            }
        }
    }
}

/// captcha欄の下に出すエラー
pub const CAPTCHA_FIELD_ERROR: &str =
    "Une erreur s'est produite avec le captcha. Veuillez réessayer.";

/// フォーム全体
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub personal: PersonalFields,
    pub company: Option<CompanyFields>,
}

impl RegistrationForm {
    pub fn fields_filled(&self) -> bool {
        self.personal.all_filled()
            && self
                .company
                .as_ref()
                .map_or(true, |company| company.all_filled())
    }

    pub fn password_check(&self) -> PasswordCheck {
        PasswordCheck::new(&self.personal.password)
    }

    pub fn evaluate(&self, captcha: CaptchaState) -> FormState {
        FormState {
            password_valid: self.password_check().is_valid(),
            fields_filled: self.fields_filled(),
            passwords_match: self.personal.passwords_match(),
            captcha_completed: captcha.completed(),
        }
    }

    /// 座標補完のクエリ（必要なときだけ）
    pub fn pending_geocode(&self) -> Option<String> {
        self.company
            .as_ref()
            .filter(|company| company.needs_geocode())
            .and_then(CompanyFields::geocode_query)
    }
}

/// 送信ボタンの判定に使う4条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormState {
    pub password_valid: bool,
    pub fields_filled: bool,
    pub passwords_match: bool,
    pub captcha_completed: bool,
}

impl FormState {
    pub fn submit_enabled(&self) -> bool {
        self.password_valid && self.fields_filled && self.passwords_match && self.captcha_completed
    }

    /// 最初に満たされていない条件（入力完了 → パスワード → 確認一致 → captcha）
    pub fn status(&self) -> FormStatus {
        if !self.fields_filled {
            FormStatus::MissingFields
        } else if !self.password_valid {
            FormStatus::WeakPassword
        } else if !self.passwords_match {
            FormStatus::PasswordMismatch
        } else if !self.captcha_completed {
            FormStatus::CaptchaPending
        } else {
            FormStatus::Ready
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    MissingFields,
    WeakPassword,
    PasswordMismatch,
    CaptchaPending,
    Ready,
}

impl FormStatus {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingFields => "Veuillez remplir tous les champs obligatoires.",
            Self::WeakPassword => "Le mot de passe ne respecte pas les critères de sécurité.",
            Self::PasswordMismatch => "Les mots de passe ne correspondent pas.",
            Self::CaptchaPending => "Veuillez valider le captcha.",
            Self::Ready => "Formulaire valide ! Vous pouvez continuer.",
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Ready)
    }

    pub fn color(&self) -> &'static str {
        if self.is_error() {
            "#ff6b6b"
        } else {
            "#37b24d"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_personal() -> PersonalFields {
        PersonalFields {
            first_name: "Marie".to_string(),
            last_name: "Curie".to_string(),
            email: "marie@example.fr".to_string(),
            phone_number: "0612345678".to_string(),
            password: "Abcdef1!".to_string(),
            password_confirm: "Abcdef1!".to_string(),
        }
    }

    fn filled_company() -> CompanyFields {
        CompanyFields {
            name: "Radium SARL".to_string(),
            siret: "12345678900011".to_string(),
            category: "3".to_string(),
            category_placeholder_selected: false,
            address: "1 rue Pierre et Marie Curie".to_string(),
            postal_code: "75005".to_string(),
            city: "Paris".to_string(),
            latitude: String::new(),
            longitude: String::new(),
        }
    }

    // =============================================
    // 送信ボタン
    // =============================================

    #[test]
    fn test_submit_enabled_only_when_all_four_hold() {
        let all = FormState {
            password_valid: true,
            fields_filled: true,
            passwords_match: true,
            captcha_completed: true,
        };
        assert!(all.submit_enabled());

        for i in 0..4 {
            let mut state = all;
            match i {
                0 => state.password_valid = false,
                1 => state.fields_filled = false,
                2 => state.passwords_match = false,
                _ => state.captcha_completed = false,
            }
            assert!(!state.submit_enabled(), "条件{}が偽でも有効になった", i);
        }
    }

    #[test]
    fn test_status_priority_order() {
        let mut state = FormState::default();
        assert_eq!(state.status(), FormStatus::MissingFields);
        state.fields_filled = true;
        assert_eq!(state.status(), FormStatus::WeakPassword);
        state.password_valid = true;
        assert_eq!(state.status(), FormStatus::PasswordMismatch);
        state.passwords_match = true;
        assert_eq!(state.status(), FormStatus::CaptchaPending);
        state.captcha_completed = true;
        assert_eq!(state.status(), FormStatus::Ready);
        assert!(!state.status().is_error());
    }

    #[test]
    fn test_evaluate_personal_only() {
        let form = RegistrationForm {
            personal: filled_personal(),
            company: None,
        };
        assert!(!form.evaluate(CaptchaState::Pending).submit_enabled());
        assert!(form.evaluate(CaptchaState::Completed).submit_enabled());
        assert!(!form.evaluate(CaptchaState::Expired).submit_enabled());
    }

    #[test]
    fn test_evaluate_password_mismatch() {
        let mut personal = filled_personal();
        personal.password_confirm = "Abcdef1?".to_string();
        let form = RegistrationForm {
            personal,
            company: None,
        };
        let state = form.evaluate(CaptchaState::Completed);
        assert_eq!(state.status(), FormStatus::PasswordMismatch);
    }

    #[test]
    fn test_whitespace_only_field_is_empty() {
        let mut personal = filled_personal();
        personal.email = "   ".to_string();
        assert!(!personal.all_filled());
    }

    // =============================================
    // 会社フィールド
    // =============================================

    #[test]
    fn test_company_placeholder_category_is_empty() {
        let mut company = filled_company();
        company.category_placeholder_selected = true;
        assert!(!company.all_filled());

        let form = RegistrationForm {
            personal: filled_personal(),
            company: Some(company),
        };
        assert_eq!(
            form.evaluate(CaptchaState::Completed).status(),
            FormStatus::MissingFields
        );
    }

    #[test]
    fn test_company_coordinates_are_optional() {
        let company = filled_company();
        assert!(company.all_filled());
        assert!(!company.has_coordinates());
        assert!(company.needs_geocode());
        assert_eq!(
            company.geocode_query().as_deref(),
            Some("1 rue Pierre et Marie Curie, 75005 Paris, France")
        );
    }

    #[test]
    fn test_pending_geocode() {
        let mut form = RegistrationForm {
            personal: filled_personal(),
            company: Some(filled_company()),
        };
        assert!(form.pending_geocode().is_some());

        if let Some(company) = form.company.as_mut() {
            company.latitude = "48.84".to_string();
            company.longitude = "2.34".to_string();
        }
        assert!(form.pending_geocode().is_none());

        form.company = None;
        assert!(form.pending_geocode().is_none());
    }

    #[test]
    fn test_captcha_messages_are_distinct() {
        let messages: Vec<_> = [
            CaptchaState::Completed,
            CaptchaState::Expired,
            CaptchaState::Errored,
        ]
        .iter()
        .filter_map(|s| s.event_message())
        .collect();
        assert_eq!(messages.len(), 3);
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert!(CaptchaState::Pending.event_message().is_none());
    }
}
