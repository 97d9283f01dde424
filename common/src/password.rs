//! パスワードポリシー

use regex::Regex;

/// 記号として認める文字
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const MIN_LENGTH: usize = 8;

lazy_static::lazy_static! {
    static ref UPPERCASE_RE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref LOWERCASE_RE: Regex = Regex::new(r"[a-z]").unwrap();
    static ref DIGIT_RE: Regex = Regex::new(r"[0-9]").unwrap();
    static ref SPECIAL_RE: Regex =
        Regex::new(&format!("[{}]", regex::escape(SPECIAL_CHARACTERS))).unwrap();
}

/// 個々のルール（表示順）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    Length,
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl PasswordRule {
    pub const ALL: [PasswordRule; 5] = [
        Self::Length,
        Self::Uppercase,
        Self::Lowercase,
        Self::Digit,
        Self::Special,
    ];

    /// チェックリスト要素のid
    pub fn element_id(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Digit => "number",
            Self::Special => "special",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Length => "Au moins 8 caractères",
            Self::Uppercase => "Une lettre majuscule",
            Self::Lowercase => "Une lettre minuscule",
            Self::Digit => "Un chiffre",
            Self::Special => "Un caractère spécial (!@#$%^&*(),.?\":{}|<>)",
        }
    }
}

/// ルールごとの判定結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordCheck {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digit: bool,
    pub special: bool,
}

impl PasswordCheck {
    pub fn new(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_LENGTH,
            uppercase: UPPERCASE_RE.is_match(password),
            lowercase: LOWERCASE_RE.is_match(password),
            digit: DIGIT_RE.is_match(password),
            special: SPECIAL_RE.is_match(password),
        }
    }

    pub fn passes(&self, rule: PasswordRule) -> bool {
        match rule {
            PasswordRule::Length => self.length,
            PasswordRule::Uppercase => self.uppercase,
            PasswordRule::Lowercase => self.lowercase,
            PasswordRule::Digit => self.digit,
            PasswordRule::Special => self.special,
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = (PasswordRule, bool)> + '_ {
        PasswordRule::ALL.into_iter().map(|rule| (rule, self.passes(rule)))
    }

    pub fn failed_rules(&self) -> Vec<PasswordRule> {
        self.rules()
            .filter(|(_, ok)| !ok)
            .map(|(rule, _)| rule)
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.length && self.uppercase && self.lowercase && self.digit && self.special
    }
}

pub fn is_valid_password(password: &str) -> bool {
    PasswordCheck::new(password).is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password_passes_all_rules() {
        let check = PasswordCheck::new("Abcdef1!");
        assert!(check.rules().all(|(_, ok)| ok));
        assert!(check.is_valid());
    }

    #[test]
    fn test_lowercase_only_fails_three_rules() {
        let check = PasswordCheck::new("abcdefgh");
        assert_eq!(
            check.failed_rules(),
            vec![PasswordRule::Uppercase, PasswordRule::Digit, PasswordRule::Special]
        );
        assert!(!check.is_valid());
    }

    #[test]
    fn test_too_short() {
        let check = PasswordCheck::new("Ab1!");
        assert_eq!(check.failed_rules(), vec![PasswordRule::Length]);
    }

    #[test]
    fn test_every_special_character_counts() {
        for c in SPECIAL_CHARACTERS.chars() {
            let password = format!("Abcdef1{}", c);
            assert!(is_valid_password(&password), "記号 {:?} が認識されない", c);
        }
    }

    #[test]
    fn test_other_symbols_do_not_count() {
        assert!(!PasswordCheck::new("Abcdef1_").special);
        assert!(!PasswordCheck::new("Abcdef1-").special);
        assert!(!PasswordCheck::new("Abcdef1 ").special);
    }

    #[test]
    fn test_non_ascii_letters_are_not_cases() {
        let check = PasswordCheck::new("ÉÀÜéàü1!");
        assert!(!check.uppercase);
        assert!(!check.lowercase);
        assert!(check.length);
    }

    #[test]
    fn test_element_ids() {
        let ids: Vec<_> = PasswordRule::ALL.iter().map(|r| r.element_id()).collect();
        assert_eq!(ids, vec!["length", "uppercase", "lowercase", "number", "special"]);
    }
}
