//! 連絡先共有リスト

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 電話番号確認APIのデフォルトパス
pub const DEFAULT_PHONE_CHECK_BASE: &str = "/api-box/check_phone_number";

pub const MSG_UNKNOWN_NUMBER: &str = "Numéro de téléphone non reconu.";
pub const MSG_LOOKUP_FAILED: &str =
    "Une erreur s'est produite lors de la vérification du numéro de téléphone.";

/// 連絡先
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    pub number: String,
}

impl Contact {
    pub fn from_number(number: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            number: number.into(),
        }
    }

    /// 一覧に表示する文字列
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.number.clone()
        } else {
            format!("{} ({})", self.name, self.number)
        }
    }
}

/// 電話番号確認APIのレスポンス
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct PhoneCheckResponse {
    pub exists: bool,
}

/// 電話番号確認APIのパス
pub fn phone_check_path(base: &str, number: &str) -> String {
    format!(
        "{}/{}/",
        base.trim_end_matches('/'),
        urlencoding::encode(number.trim())
    )
}

/// 追加済み連絡先
#[derive(Debug, Clone, Default)]
pub struct ContactList {
    contacts: Vec<Contact>,
}

impl ContactList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加（番号は前後の空白を除去、重複は拒否）
    pub fn add(&mut self, mut contact: Contact) -> Result<()> {
        contact.number = contact.number.trim().to_string();
        if contact.number.is_empty() {
            tracing::debug!("空の番号は追加しない");
            return Err(Error::EmptyPhoneNumber);
        }
        if self.contains(&contact.number) {
            tracing::debug!(number = %contact.number, "登録済みの番号");
            return Err(Error::DuplicateContact(contact.number));
        }
        tracing::debug!(number = %contact.number, total = self.contacts.len() + 1, "連絡先を追加");
        self.contacts.push(contact);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Contact> {
        if index >= self.contacts.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.contacts.len(),
            });
        }
        Ok(self.contacts.remove(index))
    }

    pub fn contains(&self, number: &str) -> bool {
        let number = number.trim();
        self.contacts.iter().any(|c| c.number == number)
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn numbers(&self) -> Vec<&str> {
        self.contacts.iter().map(|c| c.number.as_str()).collect()
    }

    /// hidden フィールドに書き込む値（カンマ区切り）
    pub fn serialized(&self) -> String {
        self.numbers().join(",")
    }

    /// 送信前チェック
    ///
    /// # Arguments
    /// * `checked_existing` - チェック済みの既存連絡先の数
    ///
    /// # Returns
    /// hidden フィールドに書き込む値
    pub fn validate_submission(&self, checked_existing: usize) -> Result<String> {
        if self.contacts.is_empty() && checked_existing == 0 {
            return Err(Error::NoContacts);
        }
        Ok(self.serialized())
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(Contact::from_number("0612345678").label(), "0612345678");
        let named = Contact {
            name: "Marie".to_string(),
            number: "0612345678".to_string(),
        };
        assert_eq!(named.label(), "Marie (0612345678)");
    }

    #[test]
    fn test_add_trims_and_rejects_empty() {
        let mut list = ContactList::new();
        list.add(Contact::from_number("  0611111111 ")).unwrap();
        assert_eq!(list.numbers(), vec!["0611111111"]);
        assert!(matches!(
            list.add(Contact::from_number("   ")),
            Err(Error::EmptyPhoneNumber)
        ));
    }

    #[test]
    fn test_number_appears_once_in_serialized_field() {
        let mut list = ContactList::new();
        list.add(Contact::from_number("0611111111")).unwrap();
        list.add(Contact::from_number("0622222222")).unwrap();
        assert!(matches!(
            list.add(Contact::from_number("0611111111")),
            Err(Error::DuplicateContact(_))
        ));

        let serialized = list.validate_submission(0).unwrap();
        assert_eq!(serialized, "0611111111,0622222222");
        assert_eq!(serialized.matches("0611111111").count(), 1);
    }

    #[test]
    fn test_remove() {
        let mut list = ContactList::new();
        list.add(Contact::from_number("0611111111")).unwrap();
        list.add(Contact::from_number("0622222222")).unwrap();
        let removed = list.remove(0).unwrap();
        assert_eq!(removed.number, "0611111111");
        assert_eq!(list.serialized(), "0622222222");
        assert!(list.remove(5).is_err());
    }

    #[test]
    fn test_validate_submission_requires_some_contact() {
        let list = ContactList::new();
        assert!(matches!(list.validate_submission(0), Err(Error::NoContacts)));
        // 既存の連絡先がチェックされていれば空のままで送信できる
        assert_eq!(list.validate_submission(2).unwrap(), "");
    }

    #[test]
    fn test_phone_check_path() {
        assert_eq!(
            phone_check_path(DEFAULT_PHONE_CHECK_BASE, "0612345678"),
            "/api-box/check_phone_number/0612345678/"
        );
        assert_eq!(
            phone_check_path("/api-box/check_phone_number/", "+33 6 12"),
            "/api-box/check_phone_number/%2B33%206%2012/"
        );
    }

    #[test]
    fn test_phone_check_response() {
        let response: PhoneCheckResponse = serde_json::from_str(r#"{"exists": true}"#).unwrap();
        assert!(response.exists);
    }
}
