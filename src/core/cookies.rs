use reqwest::{
    cookie::{
        CookieStore,
        Jar,
    },
    Url,
};

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Looks up `name` in cookie text of the form `a=1; b=2`.
///
/// The first entry whose name matches exactly wins and its value is
/// percent-decoded. A value that does not decode to UTF-8 is returned as-is.
pub fn read_cookie(cookie_text: &str, name: &str) -> Option<String> {
    if cookie_text.is_empty() {
        return None;
    }

    let prefix = format!("{}=", name);

    cookie_text.split(';').map(str::trim).find_map(|entry| {
        entry.strip_prefix(prefix.as_str()).map(|raw| match urlencoding::decode(raw) {
            Ok(decoded) => decoded.into_owned(),
            Err(e) => {
                tracing::warn!("Cookie {} is not valid UTF-8 once decoded: {}", name, e);
                raw.to_string()
            }
        })
    })
}

/// Renders the jar's cookies for `url` and reads the CSRF token out of them.
pub fn csrf_token(jar: &Jar, url: &Url) -> Option<String> {
    let header = jar.cookies(url)?;
    let text = header.to_str().ok()?;
    read_cookie(text, CSRF_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_exact_name_and_decodes() {
        let text = "sessionid=abc; csrftoken=a%2Fb%3Dc; other=1";
        assert_eq!(read_cookie(text, "csrftoken"), Some("a/b=c".to_string()));
    }

    #[test]
    fn ignores_names_sharing_a_prefix() {
        let text = "csrftoken_old=stale;csrftoken=fresh";
        assert_eq!(read_cookie(text, "csrftoken"), Some("fresh".to_string()));
        assert_eq!(read_cookie("xcsrftoken=1", "csrftoken"), None);
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(read_cookie("a=1; a=2", "a"), Some("1".to_string()));
    }

    #[test]
    fn missing_or_empty_text_is_absent() {
        assert_eq!(read_cookie("", "csrftoken"), None);
        assert_eq!(read_cookie("sessionid=abc", "csrftoken"), None);
    }

    #[test]
    fn plus_is_not_treated_as_space() {
        assert_eq!(read_cookie("t=a+b", "t"), Some("a+b".to_string()));
    }

    #[test]
    fn reads_token_from_jar() {
        let jar = Jar::default();
        let url = Url::parse("http://portal.test/").unwrap();
        jar.add_cookie_str("csrftoken=tok123; Path=/", &url);
        jar.add_cookie_str("sessionid=s1; Path=/", &url);

        assert_eq!(csrf_token(&jar, &url), Some("tok123".to_string()));
    }

    #[test]
    fn empty_jar_has_no_token() {
        let jar = Jar::default();
        let url = Url::parse("http://portal.test/").unwrap();
        assert_eq!(csrf_token(&jar, &url), None);
    }
}
