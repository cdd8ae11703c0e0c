/// Returns `true` if the HTTP status code indicates a redirect.
///
/// ```
/// use keg_fetch::is_redirect;
///
/// assert!(is_redirect(302));
/// assert!(!is_redirect(200));
/// assert!(!is_redirect(304));
/// ```
pub fn is_redirect(status: u16) -> bool { matches!(status, 301 | 302 | 303 | 307 | 308) }

/// Returns `true` for 2xx codes.
pub fn is_success(status: u16) -> bool { (200..300).contains(&status) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_codes() {
        for code in [301, 302, 303, 307, 308] {
            assert!(is_redirect(code));
        }
        for code in [200, 204, 300, 304, 305, 400, 404, 500] {
            assert!(!is_redirect(code));
        }
    }

    #[test]
    fn success_codes() {
        assert!(is_success(200));
        assert!(is_success(206));
        assert!(!is_success(199));
        assert!(!is_success(301));
        assert!(!is_success(404));
    }
}
