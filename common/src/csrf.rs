//! CSRFトークン（Cookie）の取得

/// Djangoが発行するCSRFクッキー名
pub const CSRF_COOKIE: &str = "csrftoken";

/// リクエストヘッダ名
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// `document.cookie` 形式の文字列から値を取り出す
///
/// # Arguments
/// * `cookies` - "a=1; csrftoken=abc" 形式
/// * `name` - クッキー名
///
/// # Returns
/// パーセントデコード済みの値。見つからない場合はNone
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    cookies
        .split(';')
        .map(str::trim)
        .find(|cookie| cookie.starts_with(&prefix))
        .map(|cookie| {
            let raw = &cookie[prefix.len()..];
            urlencoding::decode(raw)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| raw.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_found() {
        let cookies = "sessionid=xyz; csrftoken=AbC123; theme=dark";
        assert_eq!(cookie_value(cookies, CSRF_COOKIE), Some("AbC123".to_string()));
    }

    #[test]
    fn test_cookie_value_decodes() {
        let cookies = "csrftoken=a%2Bb%3D";
        assert_eq!(cookie_value(cookies, "csrftoken"), Some("a+b=".to_string()));
    }

    #[test]
    fn test_cookie_value_prefix_must_match_whole_name() {
        let cookies = "xcsrftoken=nope; csrftokenx=nope";
        assert_eq!(cookie_value(cookies, "csrftoken"), None);
    }

    #[test]
    fn test_cookie_value_empty() {
        assert_eq!(cookie_value("", "csrftoken"), None);
    }
}
