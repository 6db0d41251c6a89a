/// Outcome of applying a detection heuristic to one response.
///
/// `NoSignal` is the 4xx/5xx short-circuit: the response carries no usable
/// existence signal and the probe ends without a hit or an explicit miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Found,
    NotFound,
    NoSignal,
}

/// A status equal to the catalog's error code means the profile is absent.
/// Any other error-class status carries no signal.
pub fn status_code(status: u16, expected_error_code: u16) -> Signal {
    if status == expected_error_code {
        Signal::NotFound
    } else if status >= 400 {
        Signal::NoSignal
    } else {
        Signal::Found
    }
}

/// The site serves an error phrase in the body of miss pages; its absence
/// means the profile exists.
pub fn error_message(status: u16, body: &str, error_text: &str) -> Signal {
    if status >= 400 {
        return Signal::NoSignal;
    }
    if body.contains(error_text) {
        Signal::NotFound
    } else {
        Signal::Found
    }
}

/// The site serves a marker phrase only on real profile pages.
pub fn profile_presence(status: u16, body: &str, marker: &str) -> Signal {
    if status >= 400 {
        return Signal::NoSignal;
    }
    if body.contains(marker) {
        Signal::Found
    } else {
        Signal::NotFound
    }
}

/// The site answers 200 for every username but redirects misses to a
/// canonical location; landing anywhere else means the profile exists.
pub fn response_url(status: u16, final_url: &str, miss_url: &str) -> Signal {
    if status >= 400 {
        return Signal::NoSignal;
    }
    if final_url == miss_url {
        Signal::NotFound
    } else {
        Signal::Found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_matrix() {
        assert_eq!(status_code(200, 404), Signal::Found);
        assert_eq!(status_code(404, 404), Signal::NotFound);
        assert_eq!(status_code(500, 404), Signal::NoSignal);
        // a redirect status exposed by a non-following client is a hit
        assert_eq!(status_code(302, 404), Signal::Found);
        assert_eq!(status_code(403, 403), Signal::NotFound);
    }

    #[test]
    fn error_message_absence_means_found() {
        assert_eq!(
            error_message(200, "Welcome ghost123!", "user not found"),
            Signal::Found
        );
        assert_eq!(
            error_message(200, "Sorry, user not found here", "user not found"),
            Signal::NotFound
        );
        assert_eq!(error_message(503, "user not found", "user not found"), Signal::NoSignal);
    }

    #[test]
    fn profile_presence_means_found() {
        assert_eq!(
            profile_presence(200, "<div class=\"profile-avatar\">", "profile-avatar"),
            Signal::Found
        );
        assert_eq!(profile_presence(200, "<html></html>", "profile-avatar"), Signal::NotFound);
        assert_eq!(profile_presence(410, "profile-avatar", "profile-avatar"), Signal::NoSignal);
    }

    #[test]
    fn response_url_compares_final_location() {
        let miss = "https://site.example/users/ghost";
        assert_eq!(response_url(200, "https://site.example/users/ghost", miss), Signal::NotFound);
        assert_eq!(response_url(200, "https://site.example/profile/ghost", miss), Signal::Found);
        assert_eq!(response_url(404, "https://site.example/users/ghost", miss), Signal::NoSignal);
    }
}
